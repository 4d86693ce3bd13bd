// input.rs - Pointer, touch and hand-gesture input
//
// Whatever the backend, the simulation only ever sees an InputState: where the
// attractor is, whether a trigger fired (and where), and whether a press is
// being held.

use glam::Vec2;
use log::warn;

use crate::config::InputConfig;
use crate::error::{Error, GestureFailure, Result};
use crate::sim::Viewport;

const LANDMARKS: usize = 21;
const PALM: usize = 0;
const ANCHOR: usize = 9;
const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

/// What the core consumes each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub attractor: Option<Vec2>,
    pub trigger: bool,
    /// Where the trigger happened, if the backend knows.
    pub origin: Option<Vec2>,
    pub sustained: bool,
}

pub trait InputSource {
    /// Current state at `now_ms`. A trigger is reported once, then consumed.
    fn sample(&mut self, now_ms: f64) -> InputState;
}

/// Normalized hand landmarks from the host's hand tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks(pub [Vec2; LANDMARKS]);

impl HandLandmarks {
    /// Accepts `x, y` pairs (42 floats) or `x, y, z` triples (63 floats).
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        let stride = match data.len() {
            42 => 2,
            63 => 3,
            n => return Err(Error::BadLandmarks(n)),
        };
        let mut pts = [Vec2::ZERO; LANDMARKS];
        for (i, p) in pts.iter_mut().enumerate() {
            *p = Vec2::new(data[i * stride], data[i * stride + 1]);
        }
        Ok(Self(pts))
    }

    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.0[ANCHOR]
    }

    /// Fingertips closer to the palm base than `threshold`.
    pub fn closed_fingers(&self, threshold: f32) -> usize {
        let palm = self.0[PALM];
        FINGERTIPS
            .iter()
            .filter(|&&tip| self.0[tip].distance(palm) < threshold)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    /// One tracker frame; `None` when no hand was found.
    Hand(Option<HandLandmarks>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Gesture,
    Pointer,
    /// Gesture input failed to start; pointer for the rest of the session.
    Fallback(GestureFailure),
}

pub struct InputAdapter {
    cfg: InputConfig,
    viewport: Viewport,
    mode: InputMode,
    attractor: Option<Vec2>,
    pressed_at: Option<f64>,
    last_release: Option<f64>,
    trigger: Option<Vec2>,
}

impl InputAdapter {
    pub fn new(cfg: InputConfig, viewport: Viewport, mode: InputMode) -> Self {
        Self {
            cfg,
            viewport,
            mode,
            attractor: None,
            pressed_at: None,
            last_release: None,
            trigger: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Switch from gesture to pointer input for good. Called once when the
    /// camera cannot be opened; never retried. No-op outside gesture mode.
    pub fn gesture_unavailable(&mut self, failure: GestureFailure) {
        if self.mode != InputMode::Gesture { return; }
        warn!("{}", Error::GestureUnavailable(failure));
        self.mode = InputMode::Fallback(failure);
        self.attractor = None;
    }

    pub fn handle(&mut self, event: InputEvent, now_ms: f64) {
        match (event, self.mode) {
            (InputEvent::Hand(hand), InputMode::Gesture) => self.hand(hand),
            (InputEvent::Hand(_), _) => {}
            // the camera owns the attractor in gesture mode
            (_, InputMode::Gesture) => {}
            (InputEvent::PointerMove(p), _) => self.attractor = Some(p),
            (InputEvent::PointerDown(p), _) => {
                self.attractor = Some(p);
                self.pressed_at = Some(now_ms);
            }
            (InputEvent::PointerUp, _) => {
                let released = self.attractor.take();
                self.pressed_at = None;
                match self.last_release {
                    Some(prev) if now_ms - prev <= self.cfg.double_tap_ms => {
                        self.trigger = Some(released.unwrap_or_else(|| self.viewport.center().truncate()));
                        self.last_release = None;
                    }
                    _ => self.last_release = Some(now_ms),
                }
            }
        }
    }

    fn hand(&mut self, hand: Option<HandLandmarks>) {
        let Some(hand) = hand else {
            self.attractor = None;
            return;
        };

        let a = hand.anchor();
        let x = if self.cfg.mirror { 1.0 - a.x } else { a.x };
        let at = Vec2::new(x * self.viewport.width, a.y * self.viewport.height);
        self.attractor = Some(at);

        if hand.closed_fingers(self.cfg.fist_threshold) >= self.cfg.fist_fingers {
            self.trigger = Some(at);
        }
    }

    /// Status line for the host UI.
    pub fn hint(&self) -> &'static str {
        match self.mode {
            InputMode::Gesture => "Open your palm to steer the particles, make a fist to switch shapes",
            InputMode::Pointer => "Swipe to steer the particles, double-tap to switch shapes",
            InputMode::Fallback(_) => "Camera unavailable, using touch: swipe to steer, double-tap to switch shapes",
        }
    }
}

impl InputSource for InputAdapter {
    fn sample(&mut self, now_ms: f64) -> InputState {
        let origin = self.trigger.take();
        InputState {
            attractor: self.attractor,
            trigger: origin.is_some(),
            origin,
            sustained: self.pressed_at.is_some_and(|t| now_ms - t >= self.cfg.sustain_ms),
        }
    }
}
