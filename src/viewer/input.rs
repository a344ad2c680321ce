/*
 * Input Module
 *
 * Mouse and keyboard handlers for the viewer.
 *
 * - Mouse movement drives the pointer force
 * - Left click places an obstacle, right click removes the nearest one
 * - Space pauses, B toggles edges, M cycles the pointer mode,
 *   R respawns the flock and C clears obstacles
 *
 * Clicks landing on the egui panel are left to egui.
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, WindowEvent};

use super::renderer::to_world;
use super::Model;

// Window position to canvas coordinates
fn world_position(model: &Model, pos: Point2) -> Point2 {
    to_world(pos, model.simulation.width(), model.simulation.height())
}

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let world = world_position(model, pos);
    model.simulation.set_pointer_position(world.x, world.y);
}

pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.simulation.pointer_left_world();
}

pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let world = world_position(model, app.mouse.position());
    match button {
        MouseButton::Left => {
            model
                .simulation
                .add_obstacle(world.x, world.y, model.display.obstacle_radius);
        }
        MouseButton::Right => {
            model.simulation.remove_nearest_obstacle(world.x, world.y);
        }
        _ => {}
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => {
            model.simulation.toggle_pause();
        }
        Key::B => {
            model.simulation.toggle_boundary_mode();
        }
        Key::M => {
            model.simulation.cycle_pointer_mode();
        }
        Key::R => model.simulation.reset(),
        Key::C => model.simulation.clear_obstacles(),
        _ => {}
    }
}

// Pass raw window events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
