use serde::{Deserialize, Serialize};

/// Rendering-cost tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    /// Stable numeric code used on the wire (0 = low, 1 = medium, 2 = high).
    pub fn code(self) -> u32 {
        match self {
            QualityTier::Low => 0,
            QualityTier::Medium => 1,
            QualityTier::High => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(QualityTier::Low),
            1 => Some(QualityTier::Medium),
            2 => Some(QualityTier::High),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    /// The full settings bundle for this tier.
    pub fn profile(self) -> QualityProfile {
        match self {
            QualityTier::Low => QualityProfile::LOW,
            QualityTier::Medium => QualityProfile::MEDIUM,
            QualityTier::High => QualityProfile::HIGH,
        }
    }
}

/// Shadow map quality requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowQuality {
    Off,
    Low,
    High,
}

/// Settings bundle for one tier. Every tier fills every field;
/// consumers read them unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub tier: QualityTier,
    /// Upper bound on particles per emitter.
    pub max_particles: u32,
    pub enable_lod: bool,
    pub enable_bloom: bool,
    /// Master switch for particle emitters.
    pub particle_effects: bool,
    /// Nebula, solar wind, comets and field lines.
    pub ambient_effects: bool,
    pub antialiasing: bool,
    pub shadows: ShadowQuality,
    pub star_count: u32,
    pub asteroid_count: u32,
    pub wormhole_particles: u32,
}

impl QualityProfile {
    pub const LOW: QualityProfile = QualityProfile {
        tier: QualityTier::Low,
        max_particles: 100,
        enable_lod: true,
        enable_bloom: false,
        particle_effects: false,
        ambient_effects: false,
        antialiasing: false,
        shadows: ShadowQuality::Off,
        star_count: 800,
        asteroid_count: 25,
        wormhole_particles: 1000,
    };

    pub const MEDIUM: QualityProfile = QualityProfile {
        tier: QualityTier::Medium,
        max_particles: 300,
        enable_lod: true,
        enable_bloom: false,
        particle_effects: true,
        ambient_effects: false,
        antialiasing: true,
        shadows: ShadowQuality::Low,
        star_count: 1500,
        asteroid_count: 50,
        wormhole_particles: 1000,
    };

    pub const HIGH: QualityProfile = QualityProfile {
        tier: QualityTier::High,
        max_particles: 2000,
        enable_lod: false,
        enable_bloom: true,
        particle_effects: true,
        ambient_effects: true,
        antialiasing: true,
        shadows: ShadowQuality::High,
        star_count: 3000,
        asteroid_count: 100,
        wormhole_particles: 2000,
    };
}

impl Default for QualityProfile {
    fn default() -> Self {
        QualityTier::default().profile()
    }
}

/// Who currently owns the tier slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityMode {
    /// The performance monitor may move the tier.
    #[default]
    Auto,
    /// The user picked a tier; auto-tuning is suspended until `Auto` is chosen again.
    Pinned,
}

/// The single tier slot shared by the performance monitor and the user's
/// quality controls.
///
/// A manual choice pins the tier. While pinned, automatic transitions are
/// refused. Selecting auto mode hands the slot back to the monitor without
/// changing the current tier.
#[derive(Debug, Clone, Default)]
pub struct QualityControl {
    profile: QualityProfile,
    mode: QualityMode,
    /// User-level LOD override layered over the profile.
    lod_override: Option<bool>,
    revision: u32,
}

impl QualityControl {
    pub fn new(tier: QualityTier) -> Self {
        Self {
            profile: tier.profile(),
            ..Default::default()
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.profile.tier
    }

    /// The active settings bundle, with the user's LOD override applied.
    pub fn profile(&self) -> QualityProfile {
        let mut profile = self.profile;
        if let Some(lod) = self.lod_override {
            profile.enable_lod = lod;
        }
        profile
    }

    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    pub fn is_pinned(&self) -> bool {
        self.mode == QualityMode::Pinned
    }

    /// Incremented on every applied change; consumers compare it to rebuild derived state.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Apply a tier chosen by the performance monitor.
    /// Returns true only if the tier actually changed.
    pub fn apply_auto(&mut self, tier: QualityTier) -> bool {
        if self.is_pinned() {
            log::debug!("Quality: auto switch to {} refused, tier pinned", tier.name());
            return false;
        }
        self.swap_profile(tier)
    }

    /// Apply a tier chosen by the user. Pins the slot.
    pub fn set_manual(&mut self, tier: QualityTier) -> bool {
        self.mode = QualityMode::Pinned;
        self.swap_profile(tier)
    }

    /// Hand the tier slot back to the performance monitor.
    pub fn resume_auto(&mut self) {
        self.mode = QualityMode::Auto;
    }

    pub fn set_lod(&mut self, enabled: bool) {
        if self.lod_override != Some(enabled) {
            self.lod_override = Some(enabled);
            self.revision = self.revision.wrapping_add(1);
        }
    }

    fn swap_profile(&mut self, tier: QualityTier) -> bool {
        if self.profile.tier == tier {
            return false;
        }
        // Whole bundle at once, never field by field
        self.profile = tier.profile();
        self.revision = self.revision.wrapping_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_consistent_profile() {
        for tier in QualityTier::ALL {
            let p = tier.profile();
            assert_eq!(p.tier, tier);
            assert!(p.max_particles > 0);
            assert!(p.star_count > 0);
            assert!(p.asteroid_count > 0);
        }
    }

    #[test]
    fn low_tier_disables_particles_and_bloom() {
        let p = QualityTier::Low.profile();
        assert!(!p.particle_effects);
        assert!(!p.enable_bloom);
        assert!(!p.ambient_effects);
    }

    #[test]
    fn tier_codes_roundtrip() {
        for tier in QualityTier::ALL {
            assert_eq!(QualityTier::from_code(tier.code()), Some(tier));
        }
        assert_eq!(QualityTier::from_code(9), None);
    }

    #[test]
    fn auto_apply_is_idempotent() {
        let mut q = QualityControl::new(QualityTier::High);
        assert!(q.apply_auto(QualityTier::Medium));
        let rev = q.revision();
        assert!(!q.apply_auto(QualityTier::Medium));
        assert_eq!(q.revision(), rev);
    }

    #[test]
    fn manual_choice_pins_against_auto() {
        let mut q = QualityControl::new(QualityTier::Medium);
        q.set_manual(QualityTier::High);
        assert!(q.is_pinned());
        assert!(!q.apply_auto(QualityTier::Low));
        assert_eq!(q.tier(), QualityTier::High);

        q.resume_auto();
        assert_eq!(q.tier(), QualityTier::High);
        assert!(q.apply_auto(QualityTier::Low));
        assert_eq!(q.tier(), QualityTier::Low);
    }

    #[test]
    fn lod_override_layers_over_profile() {
        let mut q = QualityControl::new(QualityTier::High);
        assert!(!q.profile().enable_lod);
        q.set_lod(true);
        assert!(q.profile().enable_lod);
        // Survives tier swaps
        q.apply_auto(QualityTier::Medium);
        assert!(q.profile().enable_lod);
    }

    #[test]
    fn profile_serializes_tier_lowercase() {
        let json = serde_json::to_string(&QualityProfile::LOW).unwrap();
        assert!(json.contains("\"tier\":\"low\""));
        assert!(json.contains("\"shadows\":\"off\""));
    }
}
