/*
 * Vector Module
 *
 * Guarded 2D vector helpers used by the steering rules and the integrator.
 * Zero-length inputs map to the zero vector instead of producing NaN.
 */

use nannou::prelude::*;

pub trait VectorOps {
    fn magnitude(self) -> f32;
    fn unit_or_zero(self) -> Vec2;
    fn limit(self, max: f32) -> Vec2;
    fn with_magnitude(self, magnitude: f32) -> Vec2;
}

impl VectorOps for Vec2 {
    #[inline]
    fn magnitude(self) -> f32 {
        self.length()
    }

    // Unit vector in the same direction, or zero for a zero-length input
    #[inline]
    fn unit_or_zero(self) -> Vec2 {
        let length = self.length();
        if length > 0.0 {
            self / length
        } else {
            Vec2::ZERO
        }
    }

    // Clamp the length to `max`, keeping the direction
    #[inline]
    fn limit(self, max: f32) -> Vec2 {
        let length_squared = self.length_squared();
        if length_squared > max * max && length_squared > 0.0 {
            self * (max / length_squared.sqrt())
        } else {
            self
        }
    }

    #[inline]
    fn with_magnitude(self, magnitude: f32) -> Vec2 {
        self.unit_or_zero() * magnitude
    }
}
