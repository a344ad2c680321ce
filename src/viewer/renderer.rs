/*
 * Renderer Module
 *
 * Draws the simulation: density field, trails, obstacles, pointer radius,
 * boids and the world border. The engine works in canvas coordinates
 * (origin top-left, y down); nannou draws around the window center with y
 * up, so every position goes through `to_screen`.
 */

use nannou::prelude::*;

use boids_lab::{Heatmap, PointerMode, Simulation};

use super::Model;

const BOID_SIZE: f32 = 9.0;

pub fn to_screen(position: Point2, width: f32, height: f32) -> Point2 {
    pt2(position.x - width / 2.0, height / 2.0 - position.y)
}

pub fn to_world(position: Point2, width: f32, height: f32) -> Point2 {
    pt2(position.x + width / 2.0, height / 2.0 - position.y)
}

// Speed to hue in degrees: slow boids blue, fast ones red
fn speed_to_hue(speed: f32, max_speed: f32) -> f32 {
    let speed = speed.clamp(0.0, max_speed.max(0.0));
    let map = |v: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32| {
        (v - in_min) / (in_max - in_min) * (out_max - out_min) + out_min
    };

    if speed <= 2.0 {
        240.0
    } else if speed <= 4.0 {
        map(speed, 2.0, 4.0, 180.0, 120.0)
    } else if speed <= 6.0 {
        map(speed, 4.0, 6.0, 60.0, 30.0)
    } else {
        map(speed, 6.0, max_speed, 30.0, 0.0)
    }
}

// Dark blue through magenta to yellow as density rises; None when too faint
fn heat_color(normalized: f32, intensity: f32) -> Option<Srgba> {
    let alpha = normalized * 0.8 * intensity;

    if normalized < 0.05 {
        None
    } else if normalized < 0.33 {
        let t = normalized * 3.0;
        Some(srgba(t * 100.0 / 255.0, 0.0, (150.0 + t * 50.0) / 255.0, alpha * 0.5))
    } else if normalized < 0.66 {
        let t = (normalized - 0.33) * 3.0;
        Some(srgba(
            (100.0 + t * 155.0) / 255.0,
            t * 50.0 / 255.0,
            (200.0 - t * 50.0) / 255.0,
            alpha * 0.7,
        ))
    } else {
        let t = (normalized - 0.66) * 3.0;
        Some(srgba(1.0, (100.0 + t * 155.0) / 255.0, (150.0 - t * 150.0) / 255.0, alpha))
    }
}

fn draw_heatmap(draw: &Draw, heatmap: &Heatmap, intensity: f32, width: f32, height: f32) {
    for (i, j, value) in heatmap.cells() {
        if value < 0.1 {
            continue;
        }
        let Some(normalized) = heatmap.normalized_value(i, j) else {
            continue;
        };
        let Some(color) = heat_color(normalized, intensity) else {
            continue;
        };

        let center = pt2(
            (i as f32 + 0.5) * heatmap.cell_width,
            (j as f32 + 0.5) * heatmap.cell_height,
        );
        draw.rect()
            .xy(to_screen(center, width, height))
            .w_h(heatmap.cell_width, heatmap.cell_height)
            .color(color);
    }
}

fn draw_trails(draw: &Draw, simulation: &Simulation, width: f32, height: f32) {
    let max_speed = simulation.params().max_speed;

    for (trail, boid) in simulation.trails().iter().zip(simulation.boids()) {
        if trail.len() < 2 {
            continue;
        }
        let hue = speed_to_hue(boid.speed(), max_speed) / 360.0;
        draw.polyline()
            .weight(1.0)
            .points(trail.points().map(|p| to_screen(p, width, height)))
            .color(hsla(hue, 0.8, 0.6, 0.35));
    }
}

fn draw_environment(draw: &Draw, simulation: &Simulation, width: f32, height: f32) {
    for obstacle in simulation.obstacles() {
        draw.ellipse()
            .xy(to_screen(obstacle.position, width, height))
            .radius(obstacle.radius)
            .color(rgba(0.35, 0.35, 0.45, 0.85))
            .stroke(rgba(0.7, 0.7, 0.8, 1.0))
            .stroke_weight(1.5);
    }

    let pointer = simulation.pointer();
    if pointer.is_active() {
        let color = match pointer.mode {
            PointerMode::Attract => rgba(0.3, 0.9, 0.5, 0.6),
            _ => rgba(0.95, 0.35, 0.35, 0.6),
        };
        draw.ellipse()
            .xy(to_screen(pointer.position, width, height))
            .radius(pointer.radius)
            .no_fill()
            .stroke(color)
            .stroke_weight(1.0);
    }
}

fn draw_boids(draw: &Draw, simulation: &Simulation, color_by_speed: bool, width: f32, height: f32) {
    let max_speed = simulation.params().max_speed;
    let points = [
        pt2(BOID_SIZE, 0.0),
        pt2(-BOID_SIZE * 0.6, -BOID_SIZE * 0.5),
        pt2(-BOID_SIZE * 0.6, BOID_SIZE * 0.5),
    ];

    for boid in simulation.boids() {
        // y is flipped on screen, so is the heading
        let angle = (-boid.velocity.y).atan2(boid.velocity.x);
        let color = if color_by_speed {
            hsl(speed_to_hue(boid.speed(), max_speed) / 360.0, 0.8, 0.6)
        } else {
            hsl(0.0, 0.0, 0.86)
        };

        draw.polygon()
            .color(color)
            .points(points.iter().cloned())
            .xy(to_screen(boid.position, width, height))
            .rotate(angle);
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(rgb(0.04, 0.04, 0.08));

    let simulation = &model.simulation;
    let (width, height) = (simulation.width(), simulation.height());

    if simulation.density_enabled() {
        draw_heatmap(&draw, simulation.heatmap(), model.display.heatmap_intensity, width, height);
    }
    if simulation.trails_enabled() {
        draw_trails(&draw, simulation, width, height);
    }
    draw_environment(&draw, simulation, width, height);
    draw_boids(&draw, simulation, model.display.color_by_speed, width, height);

    // World border
    draw.rect()
        .x_y(0.0, 0.0)
        .w_h(width, height)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_mapping_round_trips() {
        let world = pt2(100.0, 40.0);
        let screen = to_screen(world, 1200.0, 700.0);
        assert_eq!(screen, pt2(-500.0, 310.0));
        assert_eq!(to_world(screen, 1200.0, 700.0), world);
    }

    #[test]
    fn hue_runs_from_blue_to_red() {
        assert_eq!(speed_to_hue(1.0, 8.0), 240.0);
        assert_eq!(speed_to_hue(3.0, 8.0), 150.0);
        assert_eq!(speed_to_hue(8.0, 8.0), 0.0);
    }

    #[test]
    fn faint_cells_are_not_drawn() {
        assert!(heat_color(0.01, 1.0).is_none());
        assert!(heat_color(0.9, 1.0).is_some());
    }
}
