// meteor.rs - Shooting stars during the celebration
//
// Every meteor travels along HEADING; the renderer draws the tail against it.

use glam::Vec2;
use rand::Rng;

use super::{MAX_METEORS, Viewport, between, unit};

/// Down and to the left, normalized.
pub const HEADING: Vec2 = Vec2::new(-0.6, 0.8);

const FADE: f32 = 0.01;

pub struct Meteors {
    pub pos: Vec<Vec2>,
    pub speed: Vec<f32>,
    pub alpha: Vec<f32>,
}

impl Meteors {
    pub fn new() -> Self {
        Self { pos: Vec::new(), speed: Vec::new(), alpha: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Launch from a random point on the top edge, biased right so the
    /// streak crosses the screen.
    pub fn spawn(&mut self, vp: Viewport, rng: &mut impl Rng) {
        if self.len() >= MAX_METEORS { return; }
        self.pos.push(Vec2::new(vp.width * (0.3 + unit(rng) * 0.7), 0.0));
        self.speed.push(between(rng, 8.0, 14.0));
        self.alpha.push(1.0);
    }

    pub fn update(&mut self, vp: Viewport) {
        let mut write = 0;
        for read in 0..self.len() {
            let alpha = self.alpha[read] - FADE;
            let pos = self.pos[read] + HEADING * self.speed[read];
            if alpha <= 0.0 || pos.x < 0.0 || pos.y > vp.height { continue; }
            self.pos[write] = pos;
            self.speed[write] = self.speed[read];
            self.alpha[write] = alpha;
            write += 1;
        }
        self.pos.truncate(write);
        self.speed.truncate(write);
        self.alpha.truncate(write);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn leaves_the_viewport() {
        let vp = Viewport { width: 400.0, height: 300.0 };
        let mut rng = SmallRng::seed_from_u64(4);
        let mut m = Meteors::new();
        m.spawn(vp, &mut rng);
        m.update(vp);
        assert_eq!(m.len(), 1);
        assert!(m.pos[0].y > 0.0);
        for _ in 0..100 {
            m.update(vp);
        }
        assert!(m.is_empty());
    }
}
