//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration that maps onto `config.toml`. Every cadence
//! constant, pressure threshold and VM limit is tunable here rather than
//! hard-coded in the engine.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (the `Default` impls below)
//! 2. `config.toml` file (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [arena]
//! width = 200
//! height = 100
//! decay_sample = 32
//! decay_probability = 0.05
//!
//! [clock]
//! seed = 42
//!
//! [vm]
//! stack_depth = 8
//! allocation_attempts = 4
//! copy_mutation_rate = 0.0
//! max_offspring_area = 400
//! template_max_len = 8
//! template_search_limit = 400
//!
//! [pressure]
//! high_water = 0.9
//! low_water = 0.7
//! eviction_policy = "oldest"
//! ```

use serde::{Deserialize, Serialize};

/// Dimensions and background mutation of the memory arena.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: u16,
    pub height: u16,
    /// Cells sampled per decay sweep.
    pub decay_sample: usize,
    /// Chance that a sampled unowned cell is rewritten.
    pub decay_probability: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            decay_sample: 32,
            decay_probability: 0.05,
        }
    }
}

/// Tick cadence of the maintenance hooks.
///
/// `None` periods are derived from the arena width: one decay sweep every
/// `ceil(width / 10)` ticks and one pressure check every `width * 100`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClockConfig {
    pub decay_period: Option<u64>,
    pub pressure_period: Option<u64>,
    pub seed: Option<u64>,
    /// Ticks between periodic summary log lines.
    pub log_interval: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            decay_period: None,
            pressure_period: None,
            seed: None,
            log_interval: 1000,
        }
    }
}

/// Limits of the organism virtual machine.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VmConfig {
    pub stack_depth: usize,
    /// Positions tried along the heading before an allocation fails.
    pub allocation_attempts: u32,
    /// Per-write chance that a copied symbol is replaced by noise.
    pub copy_mutation_rate: f64,
    pub max_offspring_area: usize,
    pub template_max_len: usize,
    /// Cells scanned by a template search before giving up.
    pub template_search_limit: u32,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_depth: 8,
            allocation_attempts: 4,
            copy_mutation_rate: 0.0,
            max_offspring_area: 400,
            template_max_len: 8,
            template_search_limit: 400,
        }
    }
}

/// Order in which organisms are evicted under population pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Highest age first.
    #[default]
    Oldest,
    /// Most owned cells first, then oldest.
    LargestFootprint,
    /// Most recorded faults first, then oldest.
    MostErrors,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PressureConfig {
    /// Occupancy above which the pressure check evicts.
    pub high_water: f64,
    /// Occupancy eviction drives the arena down to.
    pub low_water: f64,
    pub eviction_policy: EvictionPolicy,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            high_water: 0.9,
            low_water: 0.7,
            eviction_policy: EvictionPolicy::Oldest,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub arena: ArenaConfig,
    pub clock: ClockConfig,
    pub vm: VmConfig,
    pub pressure: PressureConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.arena.width > 0, "Arena width must be positive");
        anyhow::ensure!(self.arena.height > 0, "Arena height must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.arena.decay_probability),
            "Decay probability must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.clock.decay_period != Some(0),
            "Decay period must be positive"
        );
        anyhow::ensure!(
            self.clock.pressure_period != Some(0),
            "Pressure period must be positive"
        );
        anyhow::ensure!(self.clock.log_interval > 0, "Log interval must be positive");

        anyhow::ensure!(self.vm.stack_depth > 0, "Stack depth must be positive");
        anyhow::ensure!(
            self.vm.allocation_attempts > 0,
            "Allocation attempts must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.vm.copy_mutation_rate),
            "Copy mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.vm.max_offspring_area > 0,
            "Max offspring area must be positive"
        );
        anyhow::ensure!(
            self.vm.template_max_len > 0,
            "Template max length must be positive"
        );
        anyhow::ensure!(
            i32::try_from(self.vm.template_search_limit).is_ok(),
            "Template search limit must fit in i32"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.pressure.high_water),
            "High-water mark must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.pressure.low_water),
            "Low-water mark must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.pressure.low_water <= self.pressure.high_water,
            "Low-water mark must not exceed the high-water mark"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Ticks between decay sweeps.
    #[must_use]
    pub fn decay_period(&self) -> u64 {
        self.clock
            .decay_period
            .unwrap_or_else(|| u64::from(self.arena.width).div_ceil(10).max(1))
    }

    /// Ticks between population-pressure checks.
    #[must_use]
    pub fn pressure_period(&self) -> u64 {
        self.clock
            .pressure_period
            .unwrap_or_else(|| (u64::from(self.arena.width) * 100).max(1))
    }

    /// Hash of everything that influences simulation outcomes. Two runs
    /// with equal fingerprints and seeds replay identically.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.arena).as_bytes());
        hasher.update(format!("{:?}", self.clock.decay_period).as_bytes());
        hasher.update(format!("{:?}", self.clock.pressure_period).as_bytes());
        hasher.update(format!("{:?}", self.clock.seed).as_bytes());
        hasher.update(format!("{:?}", self.vm).as_bytes());
        hasher.update(format!("{:?}", self.pressure).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_arena_width() {
        let config = AppConfig {
            arena: ArenaConfig {
                width: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_water_marks() {
        let config = AppConfig {
            pressure: PressureConfig {
                high_water: 0.5,
                low_water: 0.8,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_copy_mutation_rate() {
        let config = AppConfig {
            vm: VmConfig {
                copy_mutation_rate: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_template_search_limit_rejected() {
        let mut config = AppConfig::default();
        config.vm.template_search_limit = u32::MAX;
        assert!(config.validate().is_err());
        config.vm.template_search_limit = i32::MAX as u32;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_decay_period_rejected() {
        let config = AppConfig {
            clock: ClockConfig {
                decay_period: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_periods_follow_width() {
        let mut config = AppConfig::default();
        config.arena.width = 95;
        assert_eq!(config.decay_period(), 10);
        assert_eq!(config.pressure_period(), 9500);

        config.arena.width = 5;
        assert_eq!(config.decay_period(), 1);
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [arena]
            width = 40
            height = 20

            [pressure]
            eviction_policy = "largest_footprint"
            "#,
        )
        .unwrap();
        assert_eq!(config.arena.width, 40);
        assert_eq!(config.arena.decay_sample, 32);
        assert_eq!(
            config.pressure.eviction_policy,
            EvictionPolicy::LargestFootprint
        );
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let mut config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());
        config2.clock.log_interval = 7;
        assert_eq!(config1.fingerprint(), config2.fingerprint());
        config2.vm.stack_depth = 3;
        assert_ne!(config1.fingerprint(), config2.fingerprint());
    }
}
