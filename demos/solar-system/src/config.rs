/// JSON scene description.
///
/// Every section is optional; missing fields fall back to the built-in
/// solar system, so `{}` loads exactly the default scene.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bodies::{Bodies, Planet, PLANETS, SUN_NAME, SUN_RADIUS, SUN_TEMPERATURE_K};
use crate::emitters::Wormhole;
use crate::orbit::{CometOrbit, OrbitError, OrbitalBody};

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Orbit(OrbitError),
    DuplicateName(String),
    InvalidSize { name: String, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid scene JSON: {}", e),
            ConfigError::Orbit(e) => write!(f, "invalid orbit: {}", e),
            ConfigError::DuplicateName(name) => write!(f, "duplicate body name '{}'", name),
            ConfigError::InvalidSize { name, value } => {
                write!(f, "'{}' has invalid size {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Orbit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<OrbitError> for ConfigError {
    fn from(e: OrbitError) -> Self {
        ConfigError::Orbit(e)
    }
}

// ── Raw config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    pub radius: f32,
    pub temperature: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            radius: SUN_RADIUS,
            temperature: SUN_TEMPERATURE_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub name: String,
    pub radius: f32,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    #[serde(default)]
    pub rotation_speed: f64,
    #[serde(default = "default_planet_color")]
    pub color: u32,
    #[serde(default)]
    pub has_rings: bool,
    /// Axial tilt in degrees.
    #[serde(default)]
    pub tilt: f64,
    #[serde(default)]
    pub has_storms: bool,
    #[serde(default)]
    pub moons: Vec<String>,
}

fn default_planet_color() -> u32 {
    0xAAAAAA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CometConfig {
    pub name: String,
    pub orbit_radius: f64,
    pub speed: f64,
    pub inclination: f64,
    pub eccentricity: f64,
}

impl Default for CometConfig {
    fn default() -> Self {
        Self {
            name: "Halley".to_string(),
            orbit_radius: 80.0,
            speed: 0.005,
            inclination: 15.0,
            eccentricity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WormholeConfig {
    pub radius: f32,
}

impl Default for WormholeConfig {
    fn default() -> Self {
        Self { radius: Wormhole::RADIUS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub sun: SunConfig,
    pub planets: Vec<PlanetConfig>,
    /// `null` removes the comet from the scene.
    pub comet: Option<CometConfig>,
    pub wormhole: WormholeConfig,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            sun: SunConfig::default(),
            planets: PLANETS
                .iter()
                .map(|def| PlanetConfig {
                    name: def.name.to_string(),
                    radius: def.radius,
                    orbit_radius: def.orbit_radius,
                    orbit_speed: def.orbit_speed,
                    rotation_speed: def.rotation_speed,
                    color: def.color,
                    has_rings: def.has_rings,
                    tilt: def.tilt,
                    has_storms: def.has_storms,
                    moons: def.moons.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
            comet: Some(CometConfig::default()),
            wormhole: WormholeConfig::default(),
        }
    }
}

// ── Validated scene ──────────────────────────────────────────────────

/// A config that passed validation, ready to be spawned.
#[derive(Debug, Clone)]
pub struct SceneSpec {
    pub bodies: Bodies,
    pub comet: Option<CometOrbit>,
    pub wormhole_radius: f32,
}

impl SceneSpec {
    /// Sun only: the fallback when even the built-in scene fails validation.
    pub fn empty() -> Self {
        Self {
            bodies: Bodies {
                sun_radius: SUN_RADIUS,
                sun_temperature: SUN_TEMPERATURE_K,
                planets: Vec::new(),
            },
            comet: None,
            wormhole_radius: Wormhole::RADIUS,
        }
    }
}

impl UniverseConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every body and build the typed scene.
    pub fn validate(&self) -> Result<SceneSpec, ConfigError> {
        check_size(SUN_NAME, self.sun.radius)?;
        check_size("wormhole", self.wormhole.radius)?;

        let mut seen = HashSet::new();
        seen.insert(SUN_NAME.to_ascii_lowercase());

        let mut planets = Vec::with_capacity(self.planets.len());
        for p in &self.planets {
            if !seen.insert(p.name.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateName(p.name.clone()));
            }
            check_size(&p.name, p.radius)?;
            let orbit = OrbitalBody::new(p.name.clone(), p.orbit_radius, p.orbit_speed)?
                .with_rotation_speed(p.rotation_speed)
                .with_rings(p.has_rings)
                .with_tilt(p.tilt)
                .with_storms(p.has_storms);
            planets.push(Planet {
                orbit,
                radius: p.radius,
                color: p.color,
                moons: p.moons.clone(),
            });
        }

        let comet = match &self.comet {
            Some(c) => Some(CometOrbit::new(
                c.name.clone(),
                c.orbit_radius,
                c.speed,
                c.inclination,
                c.eccentricity,
            )?),
            None => None,
        };

        Ok(SceneSpec {
            bodies: Bodies {
                sun_radius: self.sun.radius,
                sun_temperature: self.sun.temperature,
                planets,
            },
            comet,
            wormhole_radius: self.wormhole.radius,
        })
    }
}

/// Parse and validate in one step.
pub fn parse_scene(json: &str) -> Result<SceneSpec, ConfigError> {
    UniverseConfig::from_json(json)?.validate()
}

fn check_size(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize {
            name: name.to_string(),
            value,
        })
    }
}
