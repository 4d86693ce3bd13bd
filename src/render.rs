// render.rs - Encode simulation state for the host renderer
//
// Three flat f32 buffers, rebuilt after every tick:
//   particles  [x, y, z, size, r, g, b, alpha]        per pool particle
//   effects    [kind, x, y, extent, r, g, b, alpha]   per effect entity
//   trails     [x, y, z, alpha]                       per trail point
//
// Effect kinds: 0 = spark (extent = size), 1 = ripple, 2 = shockwave
// (extent = radius), 3 = meteor (extent = tail length along -METEOR_HEADING).
// Colors are 0..1. Dormant particles are written with alpha 0 so indices stay
// stable.

use crate::config::ColorMode;
use crate::sim::Show;

pub const PARTICLE_STRIDE: usize = 8;
pub const EFFECT_STRIDE: usize = 8;
pub const TRAIL_STRIDE: usize = 4;

const TAIL: f32 = 6.0; // meteor tail, in ticks of travel

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectKind {
    Spark = 0,
    Ripple = 1,
    Shockwave = 2,
    Meteor = 3,
}

pub struct Encoder {
    particles: Vec<f32>,
    effects: Vec<f32>,
    trails: Vec<f32>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { particles: Vec::new(), effects: Vec::new(), trails: Vec::new() }
    }

    pub fn encode(&mut self, show: &Show) {
        self.particles.clear();
        self.effects.clear();
        self.trails.clear();
        self.encode_particles(show);
        self.encode_effects(show);
    }

    fn encode_particles(&mut self, show: &Show) {
        let cfg = show.config();
        let p = show.particles();

        for i in 0..p.len() {
            let rgb = match cfg.color_mode {
                ColorMode::Palette => palette_rgb(&cfg.palette, p.color[i]),
                ColorMode::Hue => hsl_to_rgb(p.hue[i], 1.0, 0.6),
            };
            let alpha = if p.dormant[i] { 0.0 } else { p.alpha[i].clamp(0.0, 1.0) };
            let q = p.pos[i];
            self.particles
                .extend_from_slice(&[q.x, q.y, q.z, p.size[i], rgb[0], rgb[1], rgb[2], alpha]);

            // Trail fades with age
            let n = p.trails.len(i);
            for (k, t) in p.trails.iter(i).enumerate() {
                let fade = alpha * (1.0 - (k + 1) as f32 / (n + 1) as f32);
                self.trails.extend_from_slice(&[t.x, t.y, t.z, fade]);
            }
        }
    }

    fn encode_effects(&mut self, show: &Show) {
        let palette = &show.config().palette;

        let fw = show.fireworks();
        for i in 0..fw.len() {
            let rgb = palette_rgb(palette, fw.color[i]);
            self.push_effect(EffectKind::Spark, fw.pos[i].x, fw.pos[i].y, fw.size[i], rgb, fw.alpha[i]);
        }

        let gold = palette_rgb(palette, 0);
        let r = show.ripples();
        for i in 0..r.len() {
            self.push_effect(EffectKind::Ripple, r.center[i].x, r.center[i].y, r.radius[i], gold, r.alpha[i]);
        }

        let s = show.shockwaves();
        for i in 0..s.len() {
            self.push_effect(EffectKind::Shockwave, s.center[i].x, s.center[i].y, s.radius[i], [1.0; 3], s.alpha[i]);
        }

        let m = show.meteors();
        for i in 0..m.len() {
            self.push_effect(EffectKind::Meteor, m.pos[i].x, m.pos[i].y, m.speed[i] * TAIL, [1.0; 3], m.alpha[i]);
        }
    }

    #[inline]
    fn push_effect(&mut self, kind: EffectKind, x: f32, y: f32, extent: f32, rgb: [f32; 3], alpha: f32) {
        self.effects
            .extend_from_slice(&[kind as u8 as f32, x, y, extent, rgb[0], rgb[1], rgb[2], alpha]);
    }

    pub fn particles(&self) -> &[f32] { &self.particles }
    pub fn effects(&self) -> &[f32] { &self.effects }
    pub fn trails(&self) -> &[f32] { &self.trails }

    pub fn particles_ptr(&self) -> *const f32 { self.particles.as_ptr() }
    pub fn particles_len(&self) -> usize { self.particles.len() }
    pub fn effects_ptr(&self) -> *const f32 { self.effects.as_ptr() }
    pub fn effects_len(&self) -> usize { self.effects.len() }
    pub fn trails_ptr(&self) -> *const f32 { self.trails.as_ptr() }
    pub fn trails_len(&self) -> usize { self.trails.len() }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn palette_rgb(palette: &[[u8; 3]], idx: usize) -> [f32; 3] {
    let c = palette.get(idx).copied().unwrap_or([0xff; 3]);
    [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0]
}

/// `h` in degrees, `s` and `l` in 0..1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, Expiry, MotionConfig, ShowConfig};
    use crate::input::InputState;
    use crate::input::InputSource;
    use crate::sim::Viewport;

    struct Idle;

    impl InputSource for Idle {
        fn sample(&mut self, _now_ms: f64) -> InputState {
            InputState::default()
        }
    }

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn hsl_primaries() {
        assert!(approx(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(approx(hsl_to_rgb(120.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(approx(hsl_to_rgb(240.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        assert!(approx(hsl_to_rgb(360.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn one_record_per_particle() {
        let cfg = ShowConfig { particle_count: 40, trail_length: 3, ..Default::default() };
        let mut show = Show::new(cfg, Viewport::new(320.0, 240.0), 9).unwrap();
        let mut enc = Encoder::new();

        show.tick(0.0, &mut Idle);
        show.tick(16.0, &mut Idle);
        enc.encode(&show);

        assert_eq!(enc.particles_len(), 40 * PARTICLE_STRIDE);
        assert_eq!(enc.trails_len(), 40 * 2 * TRAIL_STRIDE);
        assert!(enc.effects().is_empty());

        let p = show.particles();
        let rec = &enc.particles()[PARTICLE_STRIDE * 7..PARTICLE_STRIDE * 8];
        assert_eq!(rec[0], p.pos[7].x);
        assert_eq!(rec[3], p.size[7]);
        assert_eq!(rec[7], p.alpha[7]);
    }

    #[test]
    fn effects_are_tagged() {
        let cfg = ShowConfig { particle_count: 10, ..Default::default() };
        let mut show = Show::new(cfg, Viewport::new(320.0, 240.0), 3).unwrap();
        show.trigger(0.0);
        show.trigger(2000.0);
        let mut enc = Encoder::new();
        enc.encode(&show);

        let kinds: Vec<f32> = enc.effects().chunks(EFFECT_STRIDE).map(|r| r[0]).collect();
        assert_eq!(kinds, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn hue_mode_colors_from_hue() {
        let cfg = ShowConfig { particle_count: 12, color_mode: ColorMode::Hue, ..Default::default() };
        let mut show = Show::new(cfg, Viewport::new(320.0, 240.0), 4).unwrap();
        show.tick(0.0, &mut Idle);
        let mut enc = Encoder::new();
        enc.encode(&show);

        let p = show.particles();
        for (i, rec) in enc.particles().chunks(PARTICLE_STRIDE).enumerate() {
            assert!(approx([rec[4], rec[5], rec[6]], hsl_to_rgb(p.hue[i], 1.0, 0.6)));
        }
    }

    #[test]
    fn dormant_particles_are_invisible() {
        let cfg = ShowConfig {
            particle_count: 25,
            trail_length: 4,
            motion: MotionConfig { expiry: Expiry::Dormant, ..Default::default() },
            ..Default::default()
        };
        let mut show = Show::new(cfg, Viewport::new(320.0, 240.0), 6).unwrap();
        show.trigger(0.0);
        show.trigger(1000.0);
        // the explosion lasts until 2000; every particle fades well before
        for k in 0..100 {
            show.tick(1000.0 + k as f64, &mut Idle);
        }
        assert!(show.particles().dormant.iter().all(|&d| d));

        let mut enc = Encoder::new();
        enc.encode(&show);
        assert_eq!(enc.particles_len(), 25 * PARTICLE_STRIDE);
        assert!(enc.particles().chunks(PARTICLE_STRIDE).all(|rec| rec[7] == 0.0));
        assert!(enc.trails().is_empty());
    }
}
