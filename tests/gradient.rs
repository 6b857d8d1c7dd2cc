use rmech::potential::{planar_gradient, rebuilt_gradient, shifted_gradient};
use rmech::{
    Configuration, Coordinate, Differencing, Differentiable, ExactPotential, Particle, Point, Polar,
    Vector1, Vector2, Vector3,
};

const DELTA: f64 = 1e-4;

/// `Σ x² + y²` over all particles.
fn bowl(configuration: &Configuration<Vector2>, _t: f64) -> f64 {
    configuration.positions().iter().map(|q| q.x() * q.x() + q.y() * q.y()).sum()
}

fn planar_pair() -> Configuration<Vector2> {
    [
        Particle::new(1.0, Vector2::new(3.0, -1.0), Vector2::new(0.0, 0.0)),
        Particle::new(2.0, Vector2::new(1.0, 1.0), Vector2::new(0.5, 0.0)),
    ]
    .into_iter()
    .collect()
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn all_estimators_agree_on_a_bowl() {
    let mut config = planar_pair();
    let before = config.clone();
    let energy = bowl(&config, 0.0);

    let planar = planar_gradient(&bowl, &mut config, 1, 0.0, energy, DELTA);
    let shifted = shifted_gradient(&bowl, &mut config, 1, 0.0, energy, DELTA);
    let rebuilt = rebuilt_gradient(&bowl, &config, 1, 0.0, energy, DELTA);

    // forward difference of x² is 2x + δ
    assert!(close(planar.x(), 2.0, 1e-3));
    assert!(close(planar.y(), 2.0, 1e-3));
    assert_eq!(planar, shifted);
    assert!(close(rebuilt.x(), planar.x(), 1e-9));
    assert!(close(rebuilt.y(), planar.y(), 1e-9));

    // estimators leave the configuration exactly as they found it
    assert_eq!(config, before);
}

#[test]
fn point_uses_rebuild_and_matches() {
    assert_eq!(<Point<2> as Differentiable>::STRATEGY, Differencing::Rebuild);
    assert_eq!(<Vector2 as Differentiable>::STRATEGY, Differencing::Planar);
    assert_eq!(<Polar as Differentiable>::STRATEGY, Differencing::Shift);

    let potential = ExactPotential::from_fn(|c: &Configuration<Point<2>>, _t: f64| -> f64 {
        c.positions().iter().map(|q| q.0[0] * q.0[0] + q.0[1] * q.0[1]).sum()
    });
    let mut config: Configuration<Point<2>> =
        [Particle::new(1.0, Point::new([1.0, 1.0]), Point::new([0.0, 0.0]))]
            .into_iter()
            .collect();
    let energy = potential.at(&config, 0.0);
    let g = potential.delta(&mut config, 0.0, energy).at(0, DELTA);
    assert!(close(g.0[0], 2.0, 1e-3));
    assert!(close(g.0[1], 2.0, 1e-3));
}

#[test]
fn shift_estimators_cover_other_dimensions() {
    let line = ExactPotential::from_fn(|c: &Configuration<Vector1>, _t: f64| -> f64 {
        c.positions().iter().map(|q| 3.0 * q.x()).sum()
    });
    let mut config: Configuration<Vector1> =
        [Particle::new(1.0, Vector1::new(0.25), Vector1::new(0.0))].into_iter().collect();
    let energy = line.at(&config, 0.0);
    let g = line.delta(&mut config, 0.0, energy).at(0, DELTA);
    assert!(close(g.x(), 3.0, 1e-9));

    let space = ExactPotential::from_fn(|c: &Configuration<Vector3>, _t: f64| -> f64 {
        c.positions().iter().map(|q| q.norm_squared()).sum()
    });
    let mut config: Configuration<Vector3> =
        [Particle::new(1.0, Vector3::new(1.0, -2.0, 0.5), Vector3::zero())].into_iter().collect();
    let energy = space.at(&config, 0.0);
    let g = space.delta(&mut config, 0.0, energy).at(0, DELTA);
    assert!(close(g.component(0), 2.0, 1e-3));
    assert!(close(g.component(1), -4.0, 1e-3));
    assert!(close(g.component(2), 1.0, 1e-3));
}

#[test]
fn polar_gradient_is_taken_on_r_and_theta() {
    let spring = ExactPotential::from_fn(|c: &Configuration<Polar>, _t: f64| -> f64 {
        c.positions().iter().map(|q| q.r_squared()).sum()
    });
    let mut config: Configuration<Polar> =
        [Particle::polar(1.0, Polar::new(1.5, 2.0), Polar::new(0.0, 1.0))].into_iter().collect();
    let energy = spring.at(&config, 0.0);
    let g = spring.delta(&mut config, 0.0, energy).at(0, DELTA);
    assert!(close(g.r(), 3.0, 1e-3));
    assert!(close(g.theta(), 0.0, 1e-9));
    assert_eq!(*config.positions().first().unwrap(), Polar::new(1.5, 2.0));
}

#[test]
fn time_reaches_the_potential() {
    let ramp = ExactPotential::from_fn(|c: &Configuration<Vector2>, t: f64| -> f64 {
        c.positions().iter().map(|q| t * q.y()).sum()
    });
    let mut config = planar_pair();
    let energy = ramp.at(&config, 4.0);
    let g = ramp.delta(&mut config, 4.0, energy).at(0, DELTA);
    assert!(close(g.x(), 0.0, 1e-9));
    assert!(close(g.y(), 4.0, 1e-6));
}
