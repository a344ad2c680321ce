/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct: the flocking parameters
 * that can be changed while the simulation runs. Changes go through
 * `set`, which only accepts known keys and sane values. Named presets apply
 * a bundle of values through the same setter.
 */

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ParamError;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub neighbor_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            neighbor_radius: 50.0,
            max_speed: 4.0,
            max_force: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    SeparationWeight,
    AlignmentWeight,
    CohesionWeight,
    NeighborRadius,
    MaxSpeed,
    MaxForce,
}

impl ParamKey {
    pub const ALL: [ParamKey; 6] = [
        ParamKey::SeparationWeight,
        ParamKey::AlignmentWeight,
        ParamKey::CohesionWeight,
        ParamKey::NeighborRadius,
        ParamKey::MaxSpeed,
        ParamKey::MaxForce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamKey::SeparationWeight => "separation_weight",
            ParamKey::AlignmentWeight => "alignment_weight",
            ParamKey::CohesionWeight => "cohesion_weight",
            ParamKey::NeighborRadius => "neighbor_radius",
            ParamKey::MaxSpeed => "max_speed",
            ParamKey::MaxForce => "max_force",
        }
    }

    // Slider ranges for the UI
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamKey::SeparationWeight | ParamKey::AlignmentWeight | ParamKey::CohesionWeight => 0.0..=3.0,
            ParamKey::NeighborRadius => 10.0..=150.0,
            ParamKey::MaxSpeed => 1.0..=10.0,
            ParamKey::MaxForce => 0.01..=1.0,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = ParamError;

    // Accepts the snake_case field names and the short camelCase control names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "separation_weight" | "separation" => Ok(ParamKey::SeparationWeight),
            "alignment_weight" | "alignment" => Ok(ParamKey::AlignmentWeight),
            "cohesion_weight" | "cohesion" => Ok(ParamKey::CohesionWeight),
            "neighbor_radius" | "neighborRadius" => Ok(ParamKey::NeighborRadius),
            "max_speed" | "maxSpeed" => Ok(ParamKey::MaxSpeed),
            "max_force" | "maxForce" => Ok(ParamKey::MaxForce),
            _ => Err(ParamError::UnknownKey(s.to_string())),
        }
    }
}

impl SimulationParams {
    pub fn get(&self, key: ParamKey) -> f32 {
        match key {
            ParamKey::SeparationWeight => self.separation_weight,
            ParamKey::AlignmentWeight => self.alignment_weight,
            ParamKey::CohesionWeight => self.cohesion_weight,
            ParamKey::NeighborRadius => self.neighbor_radius,
            ParamKey::MaxSpeed => self.max_speed,
            ParamKey::MaxForce => self.max_force,
        }
    }

    // Every parameter must be finite and non-negative
    pub fn set(&mut self, key: ParamKey, value: f32) -> Result<(), ParamError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ParamError::InvalidValue { key: key.name(), value });
        }

        let slot = match key {
            ParamKey::SeparationWeight => &mut self.separation_weight,
            ParamKey::AlignmentWeight => &mut self.alignment_weight,
            ParamKey::CohesionWeight => &mut self.cohesion_weight,
            ParamKey::NeighborRadius => &mut self.neighbor_radius,
            ParamKey::MaxSpeed => &mut self.max_speed,
            ParamKey::MaxForce => &mut self.max_force,
        };
        *slot = value;
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        self.set(name.parse()?, value)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        for key in ParamKey::ALL {
            let value = self.get(key);
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::InvalidValue { key: key.name(), value });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Schooling,
    Chaotic,
    Cluster,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Schooling, Preset::Chaotic, Preset::Cluster];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Schooling => "Schooling",
            Preset::Chaotic => "Chaotic",
            Preset::Cluster => "Cluster",
        }
    }

    // Presets leave max_force untouched
    pub fn values(self) -> [(ParamKey, f32); 5] {
        let (separation, alignment, cohesion, radius, speed) = match self {
            Preset::Schooling => (1.2, 1.8, 1.0, 60.0, 4.0),
            Preset::Chaotic => (0.5, 0.3, 0.4, 30.0, 6.0),
            Preset::Cluster => (0.8, 1.0, 2.5, 80.0, 3.0),
        };
        [
            (ParamKey::SeparationWeight, separation),
            (ParamKey::AlignmentWeight, alignment),
            (ParamKey::CohesionWeight, cohesion),
            (ParamKey::NeighborRadius, radius),
            (ParamKey::MaxSpeed, speed),
        ]
    }
}
