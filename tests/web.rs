#![cfg(target_arch = "wasm32")]

use countdown_engine::Countdown;
use countdown_engine::render::{EFFECT_STRIDE, PARTICLE_STRIDE};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn ticks_and_exposes_buffers() {
    let mut c = Countdown::new(800, 600, Some(7), false, Some(r#"{ "particle_count": 64 }"#.into())).unwrap();
    c.tick(0.0);
    assert_eq!(c.particle_count(), 64);
    assert_eq!(c.particles_len(), 64 * PARTICLE_STRIDE);
    assert_eq!(c.effects_len() % EFFECT_STRIDE, 0);
    assert!(!c.particles_ptr().is_null());
}

#[wasm_bindgen_test]
fn double_tap_starts_the_countdown() {
    let mut c = Countdown::new(800, 600, Some(7), false, None).unwrap();
    c.pointer_down(10.0, 10.0, 0.0);
    c.pointer_up(40.0);
    c.pointer_down(10.0, 10.0, 100.0);
    c.pointer_up(140.0);
    c.tick(150.0);
    assert_eq!(c.phase_name(), "morphing_to_first_year");
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(Countdown::new(800, 600, Some(7), false, Some(r#"{ "particle_count": 0 }"#.into())).is_err());
}

#[wasm_bindgen_test]
fn camera_failure_changes_the_hint() {
    let mut c = Countdown::new(800, 600, None, true, None).unwrap();
    c.gesture_unavailable("NotAllowedError");
    assert!(c.hint().starts_with("Camera unavailable"));
}
