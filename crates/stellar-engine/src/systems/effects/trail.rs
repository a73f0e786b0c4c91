//! Bounded recency buffer for fading trails.

use std::collections::VecDeque;

use glam::Vec3;

/// Fixed-capacity trail: newest position at the front, oldest evicted from the back.
#[derive(Debug, Clone)]
pub struct TrailRing {
    positions: VecDeque<Vec3>,
    capacity: usize,
}

impl TrailRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a new head position.
    pub fn push(&mut self, position: Vec3) {
        if self.capacity == 0 {
            return;
        }
        self.positions.push_front(position);
        if self.positions.len() > self.capacity {
            self.positions.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent position.
    pub fn head(&self) -> Option<Vec3> {
        self.positions.front().copied()
    }

    /// Positions from newest (index 0) to oldest.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.iter().copied()
    }

    /// Linear fade by recency: 1.0 at the head, approaching 0 at full capacity.
    pub fn alpha_at(&self, index: usize) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.capacity.saturating_sub(index)) as f32 / self.capacity as f32
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_bounded() {
        let mut t = TrailRing::new(3);
        for i in 0..5 {
            t.push(Vec3::splat(i as f32));
        }
        assert_eq!(t.len(), 3);
        let xs: Vec<f32> = t.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![4.0, 3.0, 2.0]);
        assert_eq!(t.head(), Some(Vec3::splat(4.0)));
    }

    #[test]
    fn alpha_fades_linearly() {
        let t = TrailRing::new(100);
        assert_eq!(t.alpha_at(0), 1.0);
        assert!((t.alpha_at(50) - 0.5).abs() < 1e-6);
        assert!((t.alpha_at(99) - 0.01).abs() < 1e-6);
        assert_eq!(t.alpha_at(150), 0.0);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut t = TrailRing::new(0);
        t.push(Vec3::ONE);
        assert!(t.is_empty());
    }
}
