// shockwave.rs - Fast ring pushed out by an explosion

use glam::Vec2;

use super::MAX_SHOCKWAVES;

const GROWTH: f32 = 12.0;
const FADE: f32 = 0.025;

pub struct Shockwaves {
    pub center: Vec<Vec2>,
    pub radius: Vec<f32>,
    pub alpha: Vec<f32>,
}

impl Shockwaves {
    pub fn new() -> Self {
        Self { center: Vec::new(), radius: Vec::new(), alpha: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.center.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    pub fn spawn(&mut self, at: Vec2) {
        if self.len() >= MAX_SHOCKWAVES { return; }
        self.center.push(at);
        self.radius.push(0.0);
        self.alpha.push(1.0);
    }

    /// Expand and fade; rings past `max_radius` are dropped early.
    pub fn update(&mut self, max_radius: f32) {
        let mut write = 0;
        for read in 0..self.len() {
            let alpha = self.alpha[read] - FADE;
            let radius = self.radius[read] + GROWTH;
            if alpha <= 0.0 || radius > max_radius { continue; }
            self.center[write] = self.center[read];
            self.radius[write] = radius;
            self.alpha[write] = alpha;
            write += 1;
        }
        self.center.truncate(write);
        self.radius.truncate(write);
        self.alpha.truncate(write);
    }
}
