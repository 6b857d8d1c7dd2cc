#![cfg(target_arch = "wasm32")]

use crate::config::RunnerConfig;
use crate::engine::{scene_catalog, Engine, SceneInfo, SCENE_OSCILLATOR_STEPPED};
use crate::error::MechanicsError;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

fn to_js(e: MechanicsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub fn available_scenes() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in scene_catalog() {
        out.push(&scene_info_to_js(info));
    }
    out
}

#[wasm_bindgen]
pub fn runner_defaults() -> JsValue {
    serde_wasm_bindgen::to_value(&RunnerConfig::default()).unwrap_or(JsValue::NULL)
}

fn scene_info_to_js(info: &SceneInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("coordinates"),
        &JsValue::from_str(info.coordinates),
    );
    JsValue::from(obj)
}

#[wasm_bindgen]
pub struct WasmWorld {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(scene_id: &str) -> Result<WasmWorld, JsValue> {
        let engine = Engine::new_builtin(scene_id).map_err(to_js)?;
        Ok(WasmWorld { engine })
    }

    pub fn new_demo() -> Result<WasmWorld, JsValue> {
        Self::new(SCENE_OSCILLATOR_STEPPED)
    }

    /// Build a world from a config object:
    /// {
    ///   scene?: string,
    ///   speed?: number,
    ///   stepsPerSecond?: number,
    ///   maxTimeSkip?: number
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmWorld, JsValue> {
        let cfg: CustomConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
        let scene = cfg.scene.as_deref().unwrap_or(SCENE_OSCILLATOR_STEPPED);
        let engine = Engine::new_builtin(scene)
            .and_then(|engine| engine.with_config(cfg.runner))
            .map_err(to_js)?;
        Ok(WasmWorld { engine })
    }

    pub fn len(&self) -> usize { self.engine.len() }

    pub fn scene(&self) -> String { self.engine.scene_id().to_string() }

    /// Call once per animation frame with the frame timestamp (ms). Returns the path
    /// the world took.
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let path = self.engine.frame(now_ms).map_err(to_js)?;
        Ok(format!("{:?}", path))
    }

    pub fn advance(&mut self, elapsed: f64, step_size: f64) -> Result<String, JsValue> {
        let path = self.engine.advance(elapsed, step_size).map_err(to_js)?;
        Ok(format!("{:?}", path))
    }

    pub fn set_paused(&mut self, paused: bool) { self.engine.set_paused(paused); }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsValue> {
        self.engine.set_speed(speed).map_err(to_js)
    }

    pub fn set_steps_per_second(&mut self, steps_per_second: f64) -> Result<(), JsValue> {
        self.engine.set_steps_per_second(steps_per_second).map_err(to_js)
    }

    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let runner: RunnerConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid runner config: {}", e)))?;
        self.engine.set_config(runner).map_err(to_js)
    }

    pub fn positions(&self) -> Vec<f32> { self.engine.positions_flat() }

    pub fn velocities(&self) -> Vec<f32> { self.engine.velocities_flat() }

    pub fn time(&self) -> f64 { self.engine.time() }

    pub fn potential_energy(&self) -> Option<f64> { self.engine.potential_energy() }

    pub fn kinetic_energy(&self) -> f64 { self.engine.kinetic_energy() }

    pub fn total_energy(&self) -> Option<f64> { self.engine.total_energy() }

    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.snapshot()).unwrap_or(JsValue::NULL)
    }
}

#[derive(Debug, Deserialize)]
struct CustomConfig {
    #[serde(default)]
    scene: Option<String>,
    #[serde(flatten)]
    runner: RunnerConfig,
}
