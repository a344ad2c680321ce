/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure of the flocking engine. The engine
 * is headless: renderers read `Simulation::snapshot()` and the accessors, and
 * drive it by calling `tick()`.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighbor};
pub use boundary::BoundaryMode;
pub use config::{SimulationConfig, UpdateOrder};
pub use error::{ConfigError, ParamError};
pub use forces::{Obstacle, Pointer, PointerMode};
pub use heatmap::Heatmap;
pub use params::{ParamKey, Preset, SimulationParams};
pub use simulation::{AgentState, Simulation, Snapshot, Stats};
pub use trail::Trail;
pub use vector::VectorOps;

// Define modules
pub mod boid;
pub mod boundary;
pub mod config;
pub mod error;
pub mod forces;
pub mod heatmap;
pub mod neighbors;
pub mod params;
pub mod simulation;
pub mod steering;
pub mod trail;
pub mod vector;
