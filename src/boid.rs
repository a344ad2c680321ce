/*
 * Boid Module
 *
 * This module defines the Boid struct: position, velocity, the per-tick force
 * accumulator and the neighbor cache rebuilt every tick. The steering rules
 * that read the cache live in the steering module; integration lives here.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::vector::VectorOps;

// One entry of a boid's neighbor cache. Position and velocity are copied from
// the neighbor at query time so the cache never borrows the population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance_squared: f32,
    pub position: Point2,
    pub velocity: Vec2,
}

#[derive(Clone, Debug)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub(crate) neighbors: Vec<Neighbor>,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            neighbors: Vec::new(),
        }
    }

    // Random position inside [0, width) x [0, height), random heading, and a
    // speed drawn from [min_speed, max_speed)
    pub fn random<R: Rng>(
        rng: &mut R,
        width: f32,
        height: f32,
        min_speed: f32,
        max_speed: f32,
    ) -> Self {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);

        let angle = rng.gen_range(0.0..TAU);
        let speed = if max_speed > min_speed {
            rng.gen_range(min_speed..max_speed)
        } else {
            min_speed
        };

        Self::new(pt2(x, y), vec2(angle.cos(), angle.sin()) * speed)
    }

    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn set_neighbors(&mut self, neighbors: Vec<Neighbor>) {
        self.neighbors = neighbors;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // Integrate one tick: velocity += force, clamp to max_speed, move, reset
    // the accumulator
    pub fn update(&mut self, max_speed: f32) {
        self.velocity = (self.velocity + self.acceleration).limit(max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }
}
