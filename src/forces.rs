/*
 * Environment Forces Module
 *
 * Forces that come from the world rather than from other boids: repulsion
 * from obstacles and attraction/repulsion around the pointer. Both fall off
 * linearly to zero at the edge of their influence radius, and both skip a
 * contribution when the boid sits exactly on the source.
 */

use nannou::prelude::*;

use crate::vector::VectorOps;

// Distances at or below this count as "on top of the source"
const COINCIDENT_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub position: Point2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            position: pt2(x, y),
            radius,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerMode {
    #[default]
    Off,
    Attract,
    Repel,
}

impl PointerMode {
    pub fn next(self) -> Self {
        match self {
            PointerMode::Off => PointerMode::Attract,
            PointerMode::Attract => PointerMode::Repel,
            PointerMode::Repel => PointerMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointerMode::Off => "off",
            PointerMode::Attract => "attract",
            PointerMode::Repel => "repel",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub position: Point2,
    pub on_world: bool,
    pub mode: PointerMode,
    pub radius: f32,
    pub strength: f32,
}

impl Pointer {
    pub fn new(radius: f32, strength: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            on_world: false,
            mode: PointerMode::Off,
            radius,
            strength,
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode != PointerMode::Off && self.on_world
    }
}

// Sum of repulsions from every obstacle whose avoid radius (radius + buffer)
// contains the boid
pub fn obstacle_avoidance(position: Point2, obstacles: &[Obstacle], buffer: f32, strength: f32) -> Vec2 {
    let mut force = Vec2::ZERO;

    for obstacle in obstacles {
        let avoid_radius = obstacle.radius + buffer;
        let away = position - obstacle.position;
        let distance = away.magnitude();

        if distance <= COINCIDENT_EPSILON || distance >= avoid_radius {
            continue;
        }

        force += away / distance * (strength * (1.0 - distance / avoid_radius));
    }

    force
}

pub fn pointer_force(position: Point2, pointer: &Pointer) -> Vec2 {
    if !pointer.is_active() {
        return Vec2::ZERO;
    }

    let towards = pointer.position - position;
    let distance = towards.magnitude();
    if distance <= COINCIDENT_EPSILON || distance >= pointer.radius {
        return Vec2::ZERO;
    }

    let direction = match pointer.mode {
        PointerMode::Attract => towards / distance,
        PointerMode::Repel => -towards / distance,
        PointerMode::Off => return Vec2::ZERO,
    };

    direction * (pointer.strength * (1.0 - distance / pointer.radius))
}
