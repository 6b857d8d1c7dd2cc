use rmech::engine::{SCENE_OSCILLATOR_CLOSED, SCENE_OSCILLATOR_STEPPED, SCENE_PENDULUM, SCENE_POLAR_SPRING};
use rmech::{Engine, MechanicsError};

fn main() -> Result<(), MechanicsError> {
    env_logger::init();

    let step = 0.001;
    let horizon = 20.0;
    let frames = 200;

    // Прогоняем одинаковое время в сценах с точным решением и с численным шагом
    for scene in [SCENE_OSCILLATOR_CLOSED, SCENE_OSCILLATOR_STEPPED, SCENE_POLAR_SPRING, SCENE_PENDULUM] {
        let mut engine = Engine::new_builtin(scene)?;
        let start = engine.total_energy().unwrap_or(0.0);
        let mut worst: f64 = 0.0;
        for _ in 0..frames {
            engine.advance(horizon / frames as f64, step)?;
            if let Some(e) = engine.total_energy() {
                worst = worst.max((e - start).abs());
            }
        }
        println!(
            "{:<20} t = {:>6.2} s  steps = {:>6}  E0 = {:>9.5}  max |dE| = {:.3e}",
            scene,
            engine.time(),
            engine.steps_taken(),
            start,
            worst
        );
    }
    Ok(())
}
