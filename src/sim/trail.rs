// trail.rs - Short position history per particle
//
// One flat ring buffer per particle, all in a single allocation.

use glam::Vec3;

pub struct Trails {
    cap: usize,
    points: Vec<Vec3>,
    head: Vec<usize>, // next write slot
    len: Vec<usize>,
}

impl Trails {
    pub fn new(count: usize, cap: usize) -> Self {
        Self {
            cap,
            points: vec![Vec3::ZERO; count * cap],
            head: vec![0; count],
            len: vec![0; count],
        }
    }

    #[inline]
    pub fn push(&mut self, i: usize, p: Vec3) {
        if self.cap == 0 { return; }
        let h = self.head[i];
        self.points[i * self.cap + h] = p;
        self.head[i] = (h + 1) % self.cap;
        self.len[i] = (self.len[i] + 1).min(self.cap);
    }

    #[inline]
    pub fn clear(&mut self, i: usize) {
        if self.cap == 0 { return; }
        self.head[i] = 0;
        self.len[i] = 0;
    }

    pub fn len(&self, i: usize) -> usize {
        if self.cap == 0 { 0 } else { self.len[i] }
    }

    /// Past positions of particle `i`, newest first.
    pub fn iter(&self, i: usize) -> impl Iterator<Item = Vec3> + '_ {
        let cap = self.cap;
        let (head, len) = if cap == 0 { (0, 0) } else { (self.head[i], self.len[i]) };
        (0..len).map(move |k| self.points[i * cap + (head + cap - 1 - k) % cap])
    }
}
