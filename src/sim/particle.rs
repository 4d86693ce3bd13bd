// particle.rs - The main particle pool
//
// Structure-of-Arrays layout, fixed size for the life of the show.
// Particles never leave the pool: dying resets them in place.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::trail::Trails;
use super::{Viewport, between, unit};
use crate::config::{ColorMode, Expiry, ShowConfig};
use crate::phase::Phase;

/// Off-screen slack before wrapping or resetting.
pub const MARGIN: f32 = 10.0;

/// Per-tick inputs to the pool update.
pub struct Frame<'a> {
    pub cfg: &'a ShowConfig,
    pub viewport: Viewport,
    pub phase: Phase,
    pub attractor: Option<Vec2>,
    pub sustained: bool,
    pub frame: u64,
}

/// Behavior a particle runs this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Float,
    Morph,
    Explode,
    Gather,
    Parked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    Top,
    Anywhere,
}

pub struct Particles {
    pub pos: Vec<Vec3>,
    pub vel: Vec<Vec3>,
    pub size: Vec<f32>,
    pub color: Vec<usize>, // palette index
    pub hue: Vec<f32>,
    pub alpha: Vec<f32>,
    pub target: Vec<Option<Vec3>>,
    pub bursting: Vec<bool>,
    pub dormant: Vec<bool>,
    pub seed: Vec<f32>, // wobble phase
    pub trails: Trails,
}

impl Particles {
    pub fn new(cfg: &ShowConfig, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let n = cfg.particle_count;
        let mut pool = Self {
            pos: vec![Vec3::ZERO; n],
            vel: vec![Vec3::ZERO; n],
            size: vec![0.0; n],
            color: vec![0; n],
            hue: vec![0.0; n],
            alpha: vec![0.0; n],
            target: vec![None; n],
            bursting: vec![false; n],
            dormant: vec![false; n],
            seed: vec![0.0; n],
            trails: Trails::new(n, cfg.trail_length),
        };
        for i in 0..n {
            pool.respawn(i, Spawn::Anywhere, cfg, viewport, rng);
        }
        pool
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Which behavior particle `i` runs under `phase`.
    #[inline]
    pub fn mode(&self, i: usize, phase: Phase) -> Mode {
        if self.dormant[i] {
            Mode::Parked
        } else if phase == Phase::Gathering {
            Mode::Gather
        } else if phase == Phase::Exploding && self.bursting[i] {
            Mode::Explode
        } else if self.target[i].is_some() {
            Mode::Morph
        } else {
            Mode::Float
        }
    }

    /// Fresh random state for particle `i`.
    pub fn respawn(&mut self, i: usize, spawn: Spawn, cfg: &ShowConfig, vp: Viewport, rng: &mut impl Rng) {
        let x = unit(rng) * vp.width;
        let y = match spawn {
            Spawn::Top => -MARGIN,
            Spawn::Anywhere => unit(rng) * vp.height,
        };
        let volume = cfg.is_volume();
        let z = if volume { (unit(rng) - 0.5) * cfg.depth } else { 0.0 };

        self.pos[i] = Vec3::new(x, y, z);
        self.vel[i] = Vec3::new(
            between(rng, -cfg.drift_x, cfg.drift_x),
            between(rng, cfg.fall_min, cfg.fall_max),
            if volume { between(rng, -cfg.drift_x, cfg.drift_x) } else { 0.0 },
        );
        self.size[i] = between(rng, cfg.size_min, cfg.size_max);
        self.color[i] = rng.gen_range(0..cfg.palette.len());
        self.hue[i] = unit(rng) * 360.0;
        self.alpha[i] = between(rng, cfg.alpha_min, 1.0);
        self.target[i] = None;
        self.bursting[i] = false;
        self.dormant[i] = false;
        self.seed[i] = unit(rng) * std::f32::consts::TAU;
        self.trails.clear(i);
    }

    /// Particle `i` takes `points[i % len]`. An empty set changes nothing.
    pub fn assign_targets(&mut self, points: &[Vec3]) {
        if points.is_empty() { return; }
        for (i, t) in self.target.iter_mut().enumerate() {
            *t = Some(points[i % points.len()]);
        }
    }

    pub fn clear_targets(&mut self) {
        self.target.fill(None);
    }

    /// Fling every particle radially away from `pivot`.
    pub fn explode(&mut self, pivot: Vec3, cfg: &ShowConfig, rng: &mut impl Rng) {
        let m = &cfg.motion;
        for i in 0..self.len() {
            let mut dir = (self.pos[i] - pivot).normalize_or_zero();
            if dir == Vec3::ZERO {
                let a = unit(rng) * std::f32::consts::TAU;
                dir = Vec3::new(a.cos(), a.sin(), 0.0);
            }
            self.vel[i] = dir * between(rng, m.explode_speed_min, m.explode_speed_max);
            self.target[i] = None;
            self.bursting[i] = true;
            self.dormant[i] = false;
        }
    }

    /// Stop the explosion and bring faded particles back for the next shape.
    pub fn begin_gather(&mut self, cfg: &ShowConfig, rng: &mut impl Rng) {
        for i in 0..self.len() {
            self.target[i] = None;
            self.bursting[i] = false;
            if self.dormant[i] || self.alpha[i] < cfg.alpha_min {
                self.alpha[i] = between(rng, cfg.alpha_min, 1.0);
                self.dormant[i] = false;
            }
        }
    }

    pub fn update(&mut self, f: &Frame, rng: &mut impl Rng) {
        let cfg = f.cfg;
        let hue = cfg.color_mode == ColorMode::Hue;

        for i in 0..self.len() {
            let mode = self.mode(i, f.phase);
            if mode == Mode::Parked { continue; }

            self.trails.push(i, self.pos[i]);
            if hue {
                self.hue[i] = (self.hue[i] + cfg.hue_speed).rem_euclid(360.0);
            }

            match mode {
                Mode::Float => self.float(i, f, rng),
                Mode::Morph => {
                    if let Some(t) = self.target[i] {
                        let q = self.pos[i];
                        self.pos[i] = q + (t - q) * cfg.motion.ease;
                    }
                }
                Mode::Explode => self.burst(i, f, rng),
                Mode::Gather => {
                    let c = f.viewport.center();
                    let q = self.pos[i];
                    self.pos[i] = q + (c - q) * cfg.motion.gather_ease;
                }
                Mode::Parked => {}
            }
        }
    }

    fn float(&mut self, i: usize, f: &Frame, rng: &mut impl Rng) {
        let cfg = f.cfg;
        let (w, h) = (f.viewport.width, f.viewport.height);
        let mut p = self.pos[i] + self.vel[i];

        if cfg.wobble > 0.0 {
            p.x += cfg.wobble * (f.frame as f32 * 0.05 + self.seed[i]).sin();
        }

        if let Some(a) = f.attractor {
            let delta = a - p.truncate();
            let dist = delta.length();
            let at = &cfg.attractor;
            if dist < at.radius {
                let force = (at.radius - dist) / at.radius * at.strength;
                let mut push = delta * at.polarity.sign();
                if f.sustained {
                    push += delta.perp() * at.vortex;
                }
                p.x += push.x * force;
                p.y += push.y * force;
            }
        }

        if p.y > h + MARGIN {
            self.respawn(i, Spawn::Top, cfg, f.viewport, rng);
            return;
        }
        if p.x < -MARGIN {
            p.x = w + MARGIN;
        } else if p.x > w + MARGIN {
            p.x = -MARGIN;
        }
        if cfg.is_volume() {
            let half = cfg.depth * 0.5;
            if p.z < -half {
                p.z = half;
            } else if p.z > half {
                p.z = -half;
            }
        }

        self.pos[i] = p;
    }

    fn burst(&mut self, i: usize, f: &Frame, rng: &mut impl Rng) {
        let m = &f.cfg.motion;
        self.pos[i] += self.vel[i];
        self.vel[i] *= m.friction;
        self.alpha[i] = (self.alpha[i] - m.alpha_decay).min(1.0);
        if self.alpha[i] > 0.0 { return; }

        match m.expiry {
            Expiry::Respawn => self.respawn(i, Spawn::Anywhere, f.cfg, f.viewport, rng),
            Expiry::Dormant => {
                self.alpha[i] = 0.0;
                self.vel[i] = Vec3::ZERO;
                self.bursting[i] = false;
                self.dormant[i] = true;
                self.trails.clear(i);
            }
        }
    }
}
