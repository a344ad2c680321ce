/*
 * Steering Module
 *
 * The three classical flocking rules, evaluated against a boid's neighbor
 * cache:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Every rule returns the zero vector when the cache is empty.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::SimulationParams;
use crate::vector::VectorOps;

impl Boid {
    // Average of the unit vectors pointing away from each neighbor, scaled by
    // weight. A neighbor at exactly zero distance contributes nothing but
    // still counts towards the average.
    pub fn separation(&self, weight: f32) -> Vec2 {
        if self.neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let mut steering = Vec2::ZERO;
        for neighbor in &self.neighbors {
            let distance = neighbor.distance_squared.sqrt();
            if distance > 0.0 {
                steering += (self.position - neighbor.position) / distance;
            }
        }

        steering / self.neighbors.len() as f32 * weight
    }

    pub fn alignment(&self, weight: f32, max_speed: f32, max_force: f32) -> Vec2 {
        if self.neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let mut average_velocity = Vec2::ZERO;
        for neighbor in &self.neighbors {
            average_velocity += neighbor.velocity;
        }
        average_velocity /= self.neighbors.len() as f32;

        self.steer_towards(average_velocity.with_magnitude(max_speed), max_force) * weight
    }

    pub fn cohesion(&self, weight: f32, max_speed: f32, max_force: f32) -> Vec2 {
        if self.neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let mut center = Vec2::ZERO;
        for neighbor in &self.neighbors {
            center += neighbor.position;
        }
        center /= self.neighbors.len() as f32;

        let desired = (center - self.position).with_magnitude(max_speed);
        self.steer_towards(desired, max_force) * weight
    }

    // Reynolds: steering = desired - velocity, limited to max_force
    #[inline]
    fn steer_towards(&self, desired: Vec2, max_force: f32) -> Vec2 {
        (desired - self.velocity).limit(max_force)
    }

    // Weighted sum of the three rules
    pub fn flocking_force(&self, params: &SimulationParams) -> Vec2 {
        self.separation(params.separation_weight)
            + self.alignment(params.alignment_weight, params.max_speed, params.max_force)
            + self.cohesion(params.cohesion_weight, params.max_speed, params.max_force)
    }
}
