//! JavaScript interop for the celebration effect.
//! Binds the confetti helpers defined in confetti_helpers.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/confetti_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = launchConfetti)]
    fn launch_confetti(options: JsValue);

    #[wasm_bindgen(js_name = stopConfetti)]
    fn stop_confetti();
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BurstOptions {
    particle_count: u32,
    duration_ms: u32,
    spread: f64,
}

/// Fires a confetti burst over the whole viewport. One call per completion;
/// the animation winds down on its own after `duration_ms`.
pub fn celebrate() {
    let options = BurstOptions {
        particle_count: 3,
        duration_ms: 4000,
        spread: 55.0,
    };
    let options = serde_wasm_bindgen::to_value(&options).unwrap_or(JsValue::NULL);
    launch_confetti(options);
}

/// Cancels the in-flight animation frame, if any. Safe to call when no
/// animation is running.
pub fn stop() {
    stop_confetti();
}
