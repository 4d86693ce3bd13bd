// firework.rs - Firework bursts
//
// Sparks from every burst share one compacted pool. A burst is just the
// sparks it spawned; it is gone once they have all faded.

use glam::Vec2;
use rand::Rng;

use super::{MAX_SPARKS, between, unit};

const GRAVITY: f32 = 0.05;
const FADE: f32 = 0.015;
const SPEED_MIN: f32 = 2.0;
const SPEED_MAX: f32 = 6.0;

pub struct Fireworks {
    pub pos: Vec<Vec2>,
    pub vel: Vec<Vec2>,
    pub size: Vec<f32>,
    pub color: Vec<usize>,
    pub alpha: Vec<f32>,
}

impl Fireworks {
    pub fn new() -> Self {
        Self {
            pos: Vec::new(),
            vel: Vec::new(),
            size: Vec::new(),
            color: Vec::new(),
            alpha: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn clear(&mut self) {
        self.pos.clear();
        self.vel.clear();
        self.size.clear();
        self.color.clear();
        self.alpha.clear();
    }

    /// Ring of `sparks` sparks at (x, y). Extra sparks past capacity are dropped.
    pub fn burst(&mut self, at: Vec2, sparks: usize, palette_len: usize, rng: &mut impl Rng) {
        let step = std::f32::consts::TAU / sparks.max(1) as f32;
        for i in 0..sparks {
            if self.len() >= MAX_SPARKS { return; }
            let (s, c) = (step * i as f32).sin_cos();
            let speed = between(rng, SPEED_MIN, SPEED_MAX);
            self.pos.push(at);
            self.vel.push(Vec2::new(c, s) * speed);
            self.size.push(unit(rng) * 3.0 + 2.0);
            self.color.push(rng.gen_range(0..palette_len.max(1)));
            self.alpha.push(1.0);
        }
    }

    /// Move, pull down, fade; drop sparks that have faded out.
    pub fn update(&mut self) {
        let mut write = 0;

        for read in 0..self.len() {
            let alpha = self.alpha[read] - FADE;
            if alpha <= 0.0 { continue; }

            let mut vel = self.vel[read];
            let pos = self.pos[read] + vel;
            vel.y += GRAVITY;

            self.pos[write] = pos;
            self.vel[write] = vel;
            self.size[write] = self.size[read];
            self.color[write] = self.color[read];
            self.alpha[write] = alpha;
            write += 1;
        }

        self.pos.truncate(write);
        self.vel.truncate(write);
        self.size.truncate(write);
        self.color.truncate(write);
        self.alpha.truncate(write);
    }
}
