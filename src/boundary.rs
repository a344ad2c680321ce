/*
 * Boundary Module
 *
 * What happens when a boid reaches the edge of the world, applied once per
 * boid per tick after integration:
 * - Wrap: toroidal world, a coordinate past one edge reappears at the other
 * - Bounce: the velocity component is reflected and the coordinate clamped
 */

use serde::Deserialize;

use crate::boid::Boid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    #[default]
    Wrap,
    Bounce,
}

impl BoundaryMode {
    pub fn toggled(self) -> Self {
        match self {
            BoundaryMode::Wrap => BoundaryMode::Bounce,
            BoundaryMode::Bounce => BoundaryMode::Wrap,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoundaryMode::Wrap => "wrap",
            BoundaryMode::Bounce => "bounce",
        }
    }

    pub fn apply(self, boid: &mut Boid, width: f32, height: f32) {
        match self {
            BoundaryMode::Wrap => {
                boid.position.x = wrap_coordinate(boid.position.x, width);
                boid.position.y = wrap_coordinate(boid.position.y, height);
            }
            BoundaryMode::Bounce => {
                bounce_axis(&mut boid.position.x, &mut boid.velocity.x, width);
                bounce_axis(&mut boid.position.y, &mut boid.velocity.y, height);
            }
        }
    }
}

#[inline]
fn wrap_coordinate(value: f32, bound: f32) -> f32 {
    if value < 0.0 {
        bound
    } else if value > bound {
        0.0
    } else {
        value
    }
}

#[inline]
fn bounce_axis(position: &mut f32, velocity: &mut f32, bound: f32) {
    if *position <= 0.0 || *position >= bound {
        *velocity = -*velocity;
        *position = position.clamp(0.0, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::*;

    #[test]
    fn wrap_sends_negative_x_to_far_edge() {
        let mut boid = Boid::new(pt2(-0.01, 50.0), vec2(-1.0, 0.0));
        BoundaryMode::Wrap.apply(&mut boid, 200.0, 100.0);
        assert_eq!(boid.position.x, 200.0);
        assert_eq!(boid.velocity, vec2(-1.0, 0.0));
    }

    #[test]
    fn wrap_sends_overflow_to_zero() {
        let mut boid = Boid::new(pt2(10.0, 100.5), vec2(0.0, 1.0));
        BoundaryMode::Wrap.apply(&mut boid, 200.0, 100.0);
        assert_eq!(boid.position.y, 0.0);
        assert_eq!(boid.position.x, 10.0);
    }

    #[test]
    fn bounce_reflects_and_clamps() {
        let mut boid = Boid::new(pt2(-2.0, 50.0), vec2(-3.0, 1.0));
        BoundaryMode::Bounce.apply(&mut boid, 200.0, 100.0);
        assert_eq!(boid.position.x, 0.0);
        assert_eq!(boid.velocity.x, 3.0);
        assert_eq!(boid.velocity.y, 1.0);

        let mut boid = Boid::new(pt2(50.0, 104.0), vec2(1.0, 2.5));
        BoundaryMode::Bounce.apply(&mut boid, 200.0, 100.0);
        assert_eq!(boid.position.y, 100.0);
        assert_eq!(boid.velocity.y, -2.5);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(BoundaryMode::Wrap.toggled(), BoundaryMode::Bounce);
        assert_eq!(BoundaryMode::Bounce.toggled(), BoundaryMode::Wrap);
    }
}
