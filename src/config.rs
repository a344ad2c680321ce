/*
 * Config Module
 *
 * Launch-time configuration: world size, population, update order, the
 * density field and trail settings, environment force constants, and the
 * initial flocking parameters. Loaded from TOML; every field has a default,
 * so an empty file is a valid configuration.
 */

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::boundary::BoundaryMode;
use crate::error::ConfigError;
use crate::params::SimulationParams;

// How a tick orders its per-boid work
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrder {
    // One pass, in place: later boids see earlier boids' new positions
    #[default]
    Sequential,
    // Every neighbor cache is built from the pre-tick state before any boid moves
    Simultaneous,
}

impl UpdateOrder {
    // Only the simultaneous pass has independent per-boid work to spread over threads
    pub fn allows_parallel(self) -> bool {
        self == UpdateOrder::Simultaneous
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    pub enabled: bool,
    pub resolution: usize,
    pub decay: f32,
    pub floor: f32,
    // Ticks between density updates
    pub interval: u64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolution: 30,
            decay: 0.95,
            floor: 1.0,
            interval: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub obstacle_buffer: f32,
    pub avoidance_strength: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    // Max distance from a click to an obstacle center for removal
    pub pick_threshold: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            obstacle_buffer: 40.0,
            avoidance_strength: 0.5,
            pointer_radius: 150.0,
            pointer_strength: 0.3,
            pick_threshold: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: f32,
    pub height: f32,
    pub boid_count: usize,
    pub seed: Option<u64>,
    pub boundary_mode: BoundaryMode,
    pub update_order: UpdateOrder,
    pub parallel: bool,
    pub spatial_grid: bool,
    pub stats_interval: u64,
    pub initial_speed_min: f32,
    pub initial_speed_max: f32,
    pub params: SimulationParams,
    pub density: DensityConfig,
    pub trails: TrailConfig,
    pub environment: EnvironmentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 700.0,
            boid_count: 150,
            seed: None,
            boundary_mode: BoundaryMode::Wrap,
            update_order: UpdateOrder::Sequential,
            parallel: true,
            spatial_grid: false,
            stats_interval: 10,
            initial_speed_min: 2.0,
            initial_speed_max: 4.0,
            params: SimulationParams::default(),
            density: DensityConfig::default(),
            trails: TrailConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}

impl SimulationConfig {
    // Whether ticks actually run on rayon with these settings
    pub fn runs_parallel(&self) -> bool {
        self.parallel && self.update_order.allows_parallel()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        non_negative("initial_speed_min", self.initial_speed_min)?;
        non_negative("initial_speed_max", self.initial_speed_max)?;
        if self.initial_speed_min > self.initial_speed_max {
            return Err(ConfigError::Invalid(format!(
                "initial_speed_min ({}) exceeds initial_speed_max ({})",
                self.initial_speed_min, self.initial_speed_max
            )));
        }
        if self.stats_interval == 0 {
            return Err(ConfigError::Invalid("stats_interval must be at least 1".into()));
        }

        self.params.validate()?;

        if self.density.resolution == 0 {
            return Err(ConfigError::Invalid("density.resolution must be at least 1".into()));
        }
        if !(self.density.decay > 0.0 && self.density.decay < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "density.decay must lie in (0, 1), got {}",
                self.density.decay
            )));
        }
        positive("density.floor", self.density.floor)?;
        if self.density.interval == 0 {
            return Err(ConfigError::Invalid("density.interval must be at least 1".into()));
        }

        non_negative("environment.obstacle_buffer", self.environment.obstacle_buffer)?;
        non_negative("environment.avoidance_strength", self.environment.avoidance_strength)?;
        non_negative("environment.pointer_radius", self.environment.pointer_radius)?;
        non_negative("environment.pointer_strength", self.environment.pointer_strength)?;
        non_negative("environment.pick_threshold", self.environment.pick_threshold)?;

        Ok(())
    }
}
