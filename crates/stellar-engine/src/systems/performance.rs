use std::collections::VecDeque;

use crate::systems::quality::QualityTier;

/// Fixed-capacity FIFO of one-second frame-rate samples.
#[derive(Debug, Clone)]
pub struct FpsWindow {
    samples: VecDeque<u32>,
}

impl FpsWindow {
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(Self::CAPACITY + 1),
        }
    }

    /// Push a sample, evicting the oldest once over capacity.
    pub fn push(&mut self, fps: u32) {
        self.samples.push_back(fps);
        if self.samples.len() > Self::CAPACITY {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean, or None when empty.
    pub fn average(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u32 = self.samples.iter().sum();
        Some(sum as f32 / self.samples.len() as f32)
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for FpsWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame-rate thresholds driving tier transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformancePolicy {
    /// Below this average any tier drops to low.
    pub critical_fps: f32,
    /// Below this average high drops to medium.
    pub degrade_fps: f32,
    /// Above this average low recovers to medium.
    pub recover_fps: f32,
    /// Samples needed before any decision.
    pub min_samples: usize,
}

impl Default for PerformancePolicy {
    fn default() -> Self {
        Self {
            critical_fps: 30.0,
            degrade_fps: 45.0,
            recover_fps: 55.0,
            min_samples: 3,
        }
    }
}

impl PerformancePolicy {
    /// Pure decision: the tier to switch to, or None to stay.
    /// Recovery only ever steps low -> medium; high is reached manually.
    pub fn decide(&self, avg_fps: f32, current: QualityTier) -> Option<QualityTier> {
        if avg_fps < self.critical_fps && current != QualityTier::Low {
            Some(QualityTier::Low)
        } else if avg_fps < self.degrade_fps && current == QualityTier::High {
            Some(QualityTier::Medium)
        } else if avg_fps > self.recover_fps && current == QualityTier::Low {
            Some(QualityTier::Medium)
        } else {
            None
        }
    }
}

/// Counts rendered frames per wall-clock second and recommends tier changes.
///
/// Must see every frame, including frames where gated work is skipped,
/// otherwise the count under-reports.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    policy: PerformancePolicy,
    window: FpsWindow,
    frame_count: u32,
    last_sample: f64,
}

impl PerformanceMonitor {
    /// Sampling period in seconds.
    pub const SAMPLE_PERIOD: f64 = 1.0;

    pub fn new() -> Self {
        Self::with_policy(PerformancePolicy::default())
    }

    pub fn with_policy(policy: PerformancePolicy) -> Self {
        Self {
            policy,
            window: FpsWindow::new(),
            frame_count: 0,
            last_sample: 0.0,
        }
    }

    /// Count one frame at wall-clock time `now` (seconds).
    /// Returns the completed sample when a sampling period closes.
    pub fn record_frame(&mut self, now: f64) -> Option<u32> {
        self.frame_count += 1;
        if now - self.last_sample >= Self::SAMPLE_PERIOD {
            let fps = self.frame_count;
            self.window.push(fps);
            self.frame_count = 0;
            self.last_sample = now;
            Some(fps)
        } else {
            None
        }
    }

    /// Push a sample directly (host-measured rates, tests).
    pub fn push_sample(&mut self, fps: u32) {
        self.window.push(fps);
    }

    /// Tier recommended for the current window, or None to stay put.
    pub fn recommend(&self, current: QualityTier) -> Option<QualityTier> {
        if self.window.len() < self.policy.min_samples {
            return None;
        }
        let avg = self.window.average()?;
        self.policy.decide(avg, current)
    }

    pub fn average_fps(&self) -> Option<f32> {
        self.window.average()
    }

    pub fn window(&self) -> &FpsWindow {
        &self.window
    }

    pub fn policy(&self) -> &PerformancePolicy {
        &self.policy
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::quality::QualityControl;

    fn monitor_with(samples: &[u32]) -> PerformanceMonitor {
        let mut m = PerformanceMonitor::new();
        for &s in samples {
            m.push_sample(s);
        }
        m
    }

    #[test]
    fn window_keeps_last_five_fifo() {
        let mut w = FpsWindow::new();
        for fps in [10, 20, 30, 40, 50, 60, 70] {
            w.push(fps);
        }
        assert_eq!(w.len(), 5);
        let kept: Vec<u32> = w.iter().collect();
        assert_eq!(kept, vec![30, 40, 50, 60, 70]);
    }

    #[test]
    fn window_average() {
        let mut w = FpsWindow::new();
        assert_eq!(w.average(), None);
        w.push(30);
        w.push(60);
        assert_eq!(w.average(), Some(45.0));
    }

    #[test]
    fn no_decision_before_three_samples() {
        let m = monitor_with(&[10, 10]);
        assert_eq!(m.recommend(QualityTier::High), None);
    }

    #[test]
    fn high_drops_straight_to_low_when_critical() {
        let m = monitor_with(&[20, 20, 20]);
        assert_eq!(m.recommend(QualityTier::High), Some(QualityTier::Low));
    }

    #[test]
    fn high_drops_to_medium_when_sluggish() {
        let m = monitor_with(&[40, 40, 40]);
        assert_eq!(m.recommend(QualityTier::High), Some(QualityTier::Medium));
        assert_eq!(m.recommend(QualityTier::Medium), None);
    }

    #[test]
    fn low_recovers_to_medium_never_high() {
        let m = monitor_with(&[50, 50, 50]);
        // 50 is not above the recovery threshold
        assert_eq!(m.recommend(QualityTier::Low), None);

        let m = monitor_with(&[60, 60, 60]);
        assert_eq!(m.recommend(QualityTier::Low), Some(QualityTier::Medium));
        // Medium never promotes itself
        assert_eq!(m.recommend(QualityTier::Medium), None);
    }

    #[test]
    fn fifty_from_low_never_reaches_high() {
        let mut q = QualityControl::new(QualityTier::Low);
        let mut m = PerformanceMonitor::new();
        for fps in [50, 50, 50, 60, 60, 60, 60, 60] {
            m.push_sample(fps);
            if let Some(tier) = m.recommend(q.tier()) {
                q.apply_auto(tier);
            }
            assert_ne!(q.tier(), QualityTier::High);
        }
        assert_eq!(q.tier(), QualityTier::Medium);
    }

    #[test]
    fn medium_with_low_fps_goes_low_and_disables_particles() {
        let mut q = QualityControl::new(QualityTier::Medium);
        let m = monitor_with(&[28, 29, 27]);
        let tier = m.recommend(q.tier()).unwrap();
        assert!(q.apply_auto(tier));
        assert_eq!(q.tier(), QualityTier::Low);
        assert!(!q.profile().particle_effects);
        assert!(!q.profile().enable_bloom);
    }

    #[test]
    fn record_frame_samples_each_second() {
        let mut m = PerformanceMonitor::new();
        let dt = 1.0 / 40.0;
        let mut now = 0.0;
        let mut samples = Vec::new();
        for _ in 0..210 {
            now += dt;
            if let Some(fps) = m.record_frame(now) {
                samples.push(fps);
            }
        }
        assert_eq!(samples.len(), 5);
        for fps in samples {
            assert!((39..=41).contains(&fps), "fps = {}", fps);
        }
    }

    #[test]
    fn repeated_evaluation_does_not_churn() {
        let mut q = QualityControl::new(QualityTier::High);
        let m = monitor_with(&[20, 20, 20]);
        for _ in 0..3 {
            if let Some(tier) = m.recommend(q.tier()) {
                q.apply_auto(tier);
            }
        }
        assert_eq!(q.tier(), QualityTier::Low);
        assert_eq!(q.revision(), 1);
    }
}
