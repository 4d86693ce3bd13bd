// ripple.rs - Expanding rings where the user triggered a transition

use glam::Vec2;

use super::MAX_RIPPLES;

const GROWTH: f32 = 4.0;
const FADE: f32 = 0.02;

pub struct Ripples {
    pub center: Vec<Vec2>,
    pub radius: Vec<f32>,
    pub alpha: Vec<f32>,
}

impl Ripples {
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
        if self.len() >= MAX_RIPPLES { return; }
        self.center.push(at);
        self.radius.push(0.0);
        self.alpha.push(1.0);
    }

    pub fn update(&mut self) {
        let mut write = 0;
        for read in 0..self.len() {
            let alpha = self.alpha[read] - FADE;
            if alpha <= 0.0 { continue; }
            self.center[write] = self.center[read];
            self.radius[write] = self.radius[read] + GROWTH;
            self.alpha[write] = alpha;
            write += 1;
        }
        self.center.truncate(write);
        self.radius.truncate(write);
        self.alpha.truncate(write);
    }
}
