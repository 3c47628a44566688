//! Simulation settings
//!
//! Loaded once at startup from an optional JSON file; every field has a
//! default so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HURT_COOLDOWN_TICKS, DEFAULT_HURT_TICKS, MAX_SUBSTEPS};
use crate::error::Result;

/// Parameters of the headless demo scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// RNG seed for entity placement
    pub seed: u64,
    pub circles: u32,
    pub triangles: u32,
    pub rays: u32,
    /// Fixed steps to run
    pub ticks: u32,
    /// Entities spawn within `[-extent, extent]²`
    pub arena_half_extent: f32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            seed: 12345,
            circles: 24,
            triangles: 4,
            rays: 8,
            ticks: 240,
            arena_half_extent: 20.0,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Fixed simulation rate
    pub tick_rate_hz: u32,
    /// Maximum substeps per frame to prevent spiral of death
    pub max_substeps: u32,

    // === Hurt FSM ===
    /// Ticks an entity stays hurt after a contact
    pub hurt_ticks: u32,
    /// Ticks of contact immunity after the hurt state ends
    pub hurt_cooldown_ticks: u32,

    pub demo: DemoSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 120,
            max_substeps: MAX_SUBSTEPS,
            hurt_ticks: DEFAULT_HURT_TICKS,
            hurt_cooldown_ticks: DEFAULT_HURT_COOLDOWN_TICKS,
            demo: DemoSettings::default(),
        }
    }
}

impl SimSettings {
    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = SimSettings::from_json(r#"{ "hurt_ticks": 5, "demo": { "seed": 7 } }"#)
            .unwrap();
        assert_eq!(settings.hurt_ticks, 5);
        assert_eq!(settings.demo.seed, 7);
        assert_eq!(settings.tick_rate_hz, 120);
        assert_eq!(settings.demo.circles, DemoSettings::default().circles);
    }

    #[test]
    fn test_malformed_json() {
        let err = SimSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Settings(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = SimSettings::default();
        let json = settings.to_json_pretty().unwrap();
        assert_eq!(SimSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = SimSettings::load("/nonexistent/skirmish.json").unwrap();
        assert_eq!(settings, SimSettings::default());
    }

    #[test]
    fn test_dt() {
        let settings = SimSettings {
            tick_rate_hz: 60,
            ..Default::default()
        };
        assert!((settings.dt() - 1.0 / 60.0).abs() < 1e-9);
    }
}
