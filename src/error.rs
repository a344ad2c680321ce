/*
 * Error Module
 *
 * None of these escape a running engine: `Simulation::configure` logs and
 * discards `ParamError`, and `ConfigError` only comes out of loading a
 * configuration before an engine exists.
 */

use thiserror::Error;

// Rejected runtime parameter change
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("unknown parameter `{0}`")]
    UnknownKey(String),

    #[error("invalid value {value} for parameter `{key}`")]
    InvalidValue { key: &'static str, value: f32 },
}

// Failure loading or validating a `SimulationConfig`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Param(#[from] ParamError),
}
