// glyph/ - Digit point clouds
//
// Pure functions: a digit string plus a viewport in, scattered points out.
// No state is kept between calls; the caller regenerates on every transition.

mod patterns;

pub use patterns::{COLS, Pattern, ROWS, lit, pattern};

use glam::Vec3;
use rand::Rng;

use crate::config::GlyphConfig;
use crate::sim::{Viewport, unit};

/// Horizontal layout of a digit string, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub digit_width: f32,
    pub cell: f32,
    pub start_x: f32,
    pub start_y: f32,
}

impl Layout {
    /// Center `chars` slots horizontally. Digits shrink when the string is too
    /// long to fit at the configured width ratio.
    pub fn new(chars: usize, viewport: Viewport, cfg: &GlyphConfig) -> Self {
        let slots = chars.max(1) as f32;
        let digit_width = (viewport.width * cfg.digit_width_ratio).min(viewport.width * 0.9 / slots);
        Self {
            digit_width,
            cell: digit_width / COLS as f32,
            start_x: (viewport.width - slots * digit_width) / 2.0,
            start_y: viewport.height * cfg.top_ratio,
        }
    }

    /// Top-left corner of cell (row, col) of the digit in slot `slot`.
    #[inline]
    pub fn cell_origin(&self, slot: usize, row: usize, col: usize) -> (f32, f32) {
        (
            self.start_x + slot as f32 * self.digit_width + col as f32 * self.cell,
            self.start_y + row as f32 * self.cell,
        )
    }
}

/// Lit cells across the recognized characters of `digits`.
pub fn count_on_cells(digits: &str) -> usize {
    digits.chars().filter_map(pattern).map(lit).sum()
}

/// Scatter `points_per_cell` points over every lit cell of every recognized
/// digit. Unknown characters keep their slot but emit nothing.
///
/// `depth` is the volume depth in 3D mode; `None` keeps every point on z = 0.
pub fn generate_points(
    digits: &str,
    viewport: Viewport,
    cfg: &GlyphConfig,
    depth: Option<f32>,
    rng: &mut impl Rng,
) -> Vec<Vec3> {
    let chars: Vec<char> = digits.chars().collect();
    let layout = Layout::new(chars.len(), viewport, cfg);
    let spread = layout.cell * cfg.jitter;

    let mut points = Vec::with_capacity(count_on_cells(digits) * cfg.points_per_cell);

    for (slot, &c) in chars.iter().enumerate() {
        let Some(p) = pattern(c) else { continue };

        for row in 0..ROWS {
            for col in 0..COLS {
                if p[row][col] == 0 {
                    continue;
                }
                let (ox, oy) = layout.cell_origin(slot, row, col);
                for _ in 0..cfg.points_per_cell {
                    let x = ox + unit(rng) * spread;
                    let y = oy + unit(rng) * spread;
                    let z = match depth {
                        Some(d) => (unit(rng) - 0.5) * d * 0.2,
                        None => 0.0,
                    };
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const VIEW: Viewport = Viewport { width: 1280.0, height: 720.0 };

    #[test]
    fn point_count_matches_lit_cells() {
        let cfg = GlyphConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for digits in ["2025", "2026", "0", "5566", "2"] {
            let pts = generate_points(digits, VIEW, &cfg, None, &mut rng);
            assert!(!pts.is_empty());
            assert_eq!(pts.len(), count_on_cells(digits) * cfg.points_per_cell, "{digits}");
        }
        // 2:11 + 0:12 + 2:11 + 5:11
        assert_eq!(count_on_cells("2025"), 45);
    }

    #[test]
    fn points_stay_inside_their_cell() {
        let cfg = GlyphConfig { points_per_cell: 9, ..Default::default() };
        let mut rng = SmallRng::seed_from_u64(11);
        let pts = generate_points("6", VIEW, &cfg, None, &mut rng);
        let layout = Layout::new(1, VIEW, &cfg);
        let spread = layout.cell * cfg.jitter;

        let p = pattern('6').unwrap();
        let mut k = 0;
        for row in 0..ROWS {
            for col in 0..COLS {
                if p[row][col] == 0 {
                    continue;
                }
                let (ox, oy) = layout.cell_origin(0, row, col);
                for pt in &pts[k..k + cfg.points_per_cell] {
                    assert!(pt.x >= ox && pt.x < ox + spread, "x {} outside [{ox}, {})", pt.x, ox + spread);
                    assert!(pt.y >= oy && pt.y < oy + spread);
                    assert_eq!(pt.z, 0.0);
                }
                k += cfg.points_per_cell;
            }
        }
        assert_eq!(k, pts.len());
    }

    #[test]
    fn full_jitter_stays_inside_the_digit() {
        let cfg = GlyphConfig { jitter: 1.0, ..Default::default() };
        let mut rng = SmallRng::seed_from_u64(13);
        let pts = generate_points("2", VIEW, &cfg, None, &mut rng);
        let layout = Layout::new(1, VIEW, &cfg);
        let (x0, y0) = layout.cell_origin(0, 0, 0);
        let (x1, y1) = (x0 + COLS as f32 * layout.cell, y0 + ROWS as f32 * layout.cell);

        assert!(pts.iter().all(|p| p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let cfg = GlyphConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(generate_points("", VIEW, &cfg, None, &mut rng).is_empty());
        assert!(generate_points("hny!", VIEW, &cfg, None, &mut rng).is_empty());

        let pts = generate_points("2x", VIEW, &cfg, None, &mut rng);
        assert_eq!(pts.len(), count_on_cells("2") * cfg.points_per_cell);
    }

    #[test]
    fn string_is_centered() {
        let cfg = GlyphConfig::default();
        let layout = Layout::new(4, VIEW, &cfg);
        let right = layout.start_x + 4.0 * layout.digit_width;
        assert!((layout.start_x - (VIEW.width - right)).abs() < 1e-3);
        assert!((layout.start_y - VIEW.height * 0.35).abs() < 1e-3);
    }

    #[test]
    fn long_strings_shrink_to_fit() {
        let cfg = GlyphConfig::default();
        let layout = Layout::new(12, VIEW, &cfg);
        assert!(layout.start_x >= 0.0);
        assert!(layout.digit_width * 12.0 <= VIEW.width);
    }

    #[test]
    fn volume_points_get_depth() {
        let cfg = GlyphConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let pts = generate_points("0", VIEW, &cfg, Some(300.0), &mut rng);
        assert!(pts.iter().all(|p| p.z.abs() <= 30.0));
        assert!(pts.iter().any(|p| p.z != 0.0));
    }
}
