use wasm_bindgen::prelude::*;

// ============================================================================
// COUNTDOWN - New Year particle show: drift, digits, explosion, fireworks
// ============================================================================

pub mod config;
pub mod error;
pub mod glyph;
pub mod input;
pub mod phase;
pub mod render;
pub mod sim;

pub use config::ShowConfig;
pub use error::{Error, GestureFailure, Result};
pub use input::{HandLandmarks, InputAdapter, InputEvent, InputMode, InputSource, InputState};
pub use phase::Phase;
pub use render::Encoder;
pub use sim::{Show, Viewport};

use glam::Vec2;
use log::warn;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Host-facing handle: the show, its input adapter and the output buffers.
#[wasm_bindgen]
pub struct Countdown {
    show: Show,
    input: InputAdapter,
    encoder: Encoder,
}

#[wasm_bindgen]
impl Countdown {
    /// `config` is an optional JSON document; missing fields keep defaults.
    /// Without a `seed` the RNG is seeded from `Math.random()`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        w: u32,
        h: u32,
        seed: Option<u32>,
        gesture: bool,
        config: Option<String>,
    ) -> std::result::Result<Countdown, JsValue> {
        let cfg = match config.as_deref() {
            Some(json) => ShowConfig::from_json(json),
            None => Ok(ShowConfig::default()),
        }
        .map_err(to_js)?;

        let viewport = Viewport::new(w as f32, h as f32);
        let mode = if gesture { InputMode::Gesture } else { InputMode::Pointer };
        let input = InputAdapter::new(cfg.input, viewport, mode);
        let seed = match seed {
            Some(s) => s as u64,
            None => (js_sys::Math::random() * u32::MAX as f64) as u64,
        };
        let show = Show::new(cfg, viewport, seed).map_err(to_js)?;

        Ok(Self { show, input, encoder: Encoder::new() })
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.show.tick(now_ms, &mut self.input);
        self.encoder.encode(&self.show);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.show.resize(w as f32, h as f32);
        self.input.resize(self.show.viewport());
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        self.input.handle(InputEvent::PointerMove(Vec2::new(x, y)), now_ms);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, now_ms: f64) {
        self.input.handle(InputEvent::PointerDown(Vec2::new(x, y)), now_ms);
    }

    pub fn pointer_up(&mut self, now_ms: f64) {
        self.input.handle(InputEvent::PointerUp, now_ms);
    }

    /// One hand-tracker frame. An empty slice means no hand in view.
    pub fn hand_frame(&mut self, landmarks: &[f32], now_ms: f64) {
        if landmarks.is_empty() {
            self.input.handle(InputEvent::Hand(None), now_ms);
            return;
        }
        match HandLandmarks::from_flat(landmarks) {
            Ok(hand) => self.input.handle(InputEvent::Hand(Some(hand)), now_ms),
            Err(e) => warn!("dropping hand frame: {e}"),
        }
    }

    /// The camera could not be opened; `reason` is the DOMException name.
    pub fn gesture_unavailable(&mut self, reason: &str) {
        self.input.gesture_unavailable(GestureFailure::from_reason(reason));
    }

    pub fn teardown(&mut self) {
        self.show.teardown();
    }

    pub fn hint(&self) -> String { self.input.hint().to_string() }
    pub fn phase(&self) -> u8 { self.show.phase().index() }
    pub fn phase_name(&self) -> String { self.show.phase().name().to_string() }
    pub fn blessing_visible(&self) -> bool { self.show.blessing_visible() }
    pub fn particle_count(&self) -> usize { self.show.particles().len() }

    // Accessors for WASM
    pub fn particles_ptr(&self) -> *const f32 { self.encoder.particles_ptr() }
    pub fn particles_len(&self) -> usize { self.encoder.particles_len() }
    pub fn effects_ptr(&self) -> *const f32 { self.encoder.effects_ptr() }
    pub fn effects_len(&self) -> usize { self.encoder.effects_len() }
    pub fn trails_ptr(&self) -> *const f32 { self.encoder.trails_ptr() }
    pub fn trails_len(&self) -> usize { self.encoder.trails_len() }
}

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}
