// config.rs - Tunables for the show
//
// Every variant of the animation is one ShowConfig. The host may pass a JSON
// document; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gold, light gold, orange, tomato, white, sky blue.
pub const DEFAULT_PALETTE: [[u8; 3]; 6] = [
    [0xff, 0xd7, 0x00],
    [0xff, 0xec, 0x8b],
    [0xff, 0xa5, 0x00],
    [0xff, 0x63, 0x47],
    [0xff, 0xff, 0xff],
    [0x87, 0xce, 0xeb],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub particle_count: usize,
    pub palette: Vec<[u8; 3]>,
    pub color_mode: ColorMode,
    /// Degrees per tick in `ColorMode::Hue`.
    pub hue_speed: f32,
    pub dimensions: Dimensions,
    /// Z extent of the volume in `Dimensions::Volume`.
    pub depth: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub drift_x: f32,
    pub fall_min: f32,
    pub fall_max: f32,
    pub alpha_min: f32,
    pub wobble: f32,
    pub trail_length: usize,
    pub attractor: AttractorConfig,
    pub motion: MotionConfig,
    pub glyph: GlyphConfig,
    pub timing: Timing,
    pub input: InputConfig,
    pub effects: EffectsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Palette,
    Hue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensions {
    Flat,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Pull,
    Push,
}

impl Polarity {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Polarity::Pull => 1.0,
            Polarity::Push => -1.0,
        }
    }
}

/// What happens to an exploding particle once it has faded out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Reset in place to a fresh free-floating particle.
    Respawn,
    /// Park invisibly until the next gather revives it.
    Dormant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractorConfig {
    pub radius: f32,
    pub strength: f32,
    pub polarity: Polarity,
    /// Tangential share added while the press is sustained.
    pub vortex: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub ease: f32,
    pub gather_ease: f32,
    pub explode_speed_min: f32,
    pub explode_speed_max: f32,
    pub friction: f32,
    pub alpha_decay: f32,
    pub expiry: Expiry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub first: String,
    pub second: String,
    pub points_per_cell: usize,
    pub jitter: f32,
    pub digit_width_ratio: f32,
    pub top_ratio: f32,
}

/// All durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub explode_ms: f64,
    pub gather_ms: f64,
    pub settle_ms: f64,
    pub debounce_ms: f64,
    pub firework_stagger_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub double_tap_ms: f64,
    pub sustain_ms: f64,
    /// Fingertip-to-palm distance, in normalized landmark units.
    pub fist_threshold: f32,
    pub fist_fingers: usize,
    /// Mirror x so the attractor follows a front-facing camera preview.
    pub mirror: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub firework_count: usize,
    pub firework_sparks: usize,
    pub ripples: bool,
    pub shockwaves: bool,
    pub meteor_chance: f32,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            particle_count: 2000,
            palette: DEFAULT_PALETTE.to_vec(),
            color_mode: ColorMode::Palette,
            hue_speed: 0.5,
            dimensions: Dimensions::Flat,
            depth: 300.0,
            size_min: 1.0,
            size_max: 4.0,
            drift_x: 0.25,
            fall_min: 0.5,
            fall_max: 1.5,
            alpha_min: 0.4,
            wobble: 0.0,
            trail_length: 0,
            attractor: AttractorConfig::default(),
            motion: MotionConfig::default(),
            glyph: GlyphConfig::default(),
            timing: Timing::default(),
            input: InputConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl Default for AttractorConfig {
    fn default() -> Self {
        Self { radius: 200.0, strength: 0.15, polarity: Polarity::Pull, vortex: 0.6 }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            ease: 0.08,
            gather_ease: 0.06,
            explode_speed_min: 4.0,
            explode_speed_max: 14.0,
            friction: 0.98,
            alpha_decay: 0.015,
            expiry: Expiry::Respawn,
        }
    }
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            first: "2025".into(),
            second: "2026".into(),
            points_per_cell: 12,
            jitter: 0.8,
            digit_width_ratio: 0.18,
            top_ratio: 0.35,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            explode_ms: 1000.0,
            gather_ms: 600.0,
            settle_ms: 1500.0,
            debounce_ms: 1000.0,
            firework_stagger_ms: 300.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_tap_ms: 300.0,
            sustain_ms: 500.0,
            fist_threshold: 0.15,
            fist_fingers: 3,
            mirror: true,
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            firework_count: 5,
            firework_sparks: 60,
            ripples: true,
            shockwaves: true,
            meteor_chance: 0.02,
        }
    }
}

impl ShowConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: ShowConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::invalid("particle_count", "must be at least 1"));
        }
        if self.palette.is_empty() {
            return Err(Error::invalid("palette", "needs at least one color"));
        }
        if !(self.size_min > 0.0 && self.size_min <= self.size_max) {
            return Err(Error::invalid("size_min", "must be positive and <= size_max"));
        }
        if self.fall_min > self.fall_max {
            return Err(Error::invalid("fall_min", "must be <= fall_max"));
        }
        if !(0.0..=1.0).contains(&self.alpha_min) {
            return Err(Error::invalid("alpha_min", "must be in [0, 1]"));
        }
        if self.attractor.radius <= 0.0 {
            return Err(Error::invalid("attractor.radius", "must be positive"));
        }

        let m = &self.motion;
        if !(m.ease > 0.0 && m.ease <= 1.0) {
            return Err(Error::invalid("motion.ease", "must be in (0, 1]"));
        }
        if !(m.gather_ease > 0.0 && m.gather_ease <= 1.0) {
            return Err(Error::invalid("motion.gather_ease", "must be in (0, 1]"));
        }
        if !(m.friction > 0.0 && m.friction <= 1.0) {
            return Err(Error::invalid("motion.friction", "must be in (0, 1]"));
        }
        if m.alpha_decay <= 0.0 {
            return Err(Error::invalid("motion.alpha_decay", "must be positive"));
        }
        if m.explode_speed_min > m.explode_speed_max {
            return Err(Error::invalid("motion.explode_speed_min", "must be <= explode_speed_max"));
        }

        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(Error::invalid("depth", "must be positive"));
        }

        let g = &self.glyph;
        if !(1..=64).contains(&g.points_per_cell) {
            return Err(Error::invalid("glyph.points_per_cell", "must be in 1..=64"));
        }
        // points must stay inside their cell
        if !(g.jitter > 0.0 && g.jitter <= 1.0) {
            return Err(Error::invalid("glyph.jitter", "must be in (0, 1]"));
        }
        if !(g.digit_width_ratio.is_finite() && g.digit_width_ratio > 0.0) {
            return Err(Error::invalid("glyph.digit_width_ratio", "must be positive"));
        }
        if !(g.top_ratio.is_finite() && g.top_ratio > 0.0) {
            return Err(Error::invalid("glyph.top_ratio", "must be positive"));
        }

        let i = &self.input;
        for (field, v) in [("input.double_tap_ms", i.double_tap_ms), ("input.sustain_ms", i.sustain_ms)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::invalid(field, "must be positive"));
            }
        }
        if !(i.fist_threshold.is_finite() && i.fist_threshold > 0.0) {
            return Err(Error::invalid("input.fist_threshold", "must be positive"));
        }
        if !(1..=4).contains(&i.fist_fingers) {
            return Err(Error::invalid("input.fist_fingers", "must be in 1..=4"));
        }

        let t = &self.timing;
        for (field, v) in [
            ("timing.explode_ms", t.explode_ms),
            ("timing.gather_ms", t.gather_ms),
            ("timing.settle_ms", t.settle_ms),
            ("timing.debounce_ms", t.debounce_ms),
            ("timing.firework_stagger_ms", t.firework_stagger_ms),
        ] {
            if !(v >= 0.0) {
                return Err(Error::invalid(field, "must be >= 0"));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.dimensions == Dimensions::Volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ShowConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ShowConfig::from_json(
            r#"{ "particle_count": 300, "attractor": { "polarity": "push" }, "dimensions": "volume" }"#,
        )
        .unwrap();
        assert_eq!(cfg.particle_count, 300);
        assert_eq!(cfg.attractor.polarity, Polarity::Push);
        assert_eq!(cfg.attractor.radius, 200.0);
        assert!(cfg.is_volume());
        assert_eq!(cfg.glyph.first, "2025");
    }

    #[test]
    fn rejects_out_of_range_ease() {
        let err = ShowConfig::from_json(r#"{ "motion": { "ease": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "motion.ease", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ShowConfig::from_json("{ particle_count: ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    fn rejected_field(json: &str) -> &'static str {
        match ShowConfig::from_json(json) {
            Err(Error::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig for {json}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_jitter_outside_cell() {
        assert_eq!(rejected_field(r#"{ "glyph": { "jitter": 3.0 } }"#), "glyph.jitter");
        assert_eq!(rejected_field(r#"{ "glyph": { "jitter": 0.0 } }"#), "glyph.jitter");
        ShowConfig::from_json(r#"{ "glyph": { "jitter": 1.0 } }"#).unwrap();
    }

    #[test]
    fn rejects_bad_layout_ratios() {
        assert_eq!(rejected_field(r#"{ "glyph": { "digit_width_ratio": 0.0 } }"#), "glyph.digit_width_ratio");
        assert_eq!(rejected_field(r#"{ "glyph": { "top_ratio": -0.2 } }"#), "glyph.top_ratio");
    }

    #[test]
    fn rejects_non_positive_depth() {
        assert_eq!(rejected_field(r#"{ "depth": -10.0 } "#), "depth");
        let cfg = ShowConfig { depth: f32::NAN, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { field: "depth", .. })));
    }

    #[test]
    fn rejects_bad_input_tuning() {
        assert_eq!(rejected_field(r#"{ "input": { "double_tap_ms": -1.0 } }"#), "input.double_tap_ms");
        assert_eq!(rejected_field(r#"{ "input": { "sustain_ms": -5.0 } }"#), "input.sustain_ms");
        assert_eq!(rejected_field(r#"{ "input": { "fist_threshold": -0.1 } }"#), "input.fist_threshold");
        assert_eq!(rejected_field(r#"{ "input": { "fist_fingers": 0 } }"#), "input.fist_fingers");
        assert_eq!(rejected_field(r#"{ "input": { "fist_fingers": 5 } }"#), "input.fist_fingers");
    }

    #[test]
    fn rejects_empty_pool() {
        let cfg = ShowConfig { particle_count: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
