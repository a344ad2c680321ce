/*
 * Viewer Module
 *
 * The nannou front end. It owns a Simulation and drives it from the frame
 * loop with a fixed tick rate, independent of the display refresh rate:
 * - Frame time is accumulated and drained in fixed tick-sized steps
 * - A slow frame runs at most MAX_TICKS_PER_FRAME ticks and drops the rest
 * - Nothing accumulates while paused
 */

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;

use boids_lab::{Simulation, SimulationConfig};

mod input;
mod renderer;
mod ui;

const TICK_RATE: f32 = 60.0;
const MAX_TICKS_PER_FRAME: u32 = 5;

// nannou's model function cannot capture, so the launch config waits here
static LAUNCH_CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

// Frame timing shown in the controls panel
#[derive(Default)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks_per_frame: u32,
}

// Renderer-only settings; none of these reach the engine
pub struct DisplaySettings {
    pub heatmap_intensity: f32,
    pub color_by_speed: bool,
    pub obstacle_radius: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            heatmap_intensity: 0.7,
            color_by_speed: true,
            obstacle_radius: 30.0,
        }
    }
}

pub struct Model {
    pub simulation: Simulation,
    pub egui: Egui,
    pub display: DisplaySettings,
    pub frame_stats: FrameStats,
    pub tick_accumulator: Duration,
    pub tick_step: Duration,
    pub last_update_time: Instant,
}

pub fn run(config: SimulationConfig) {
    if LAUNCH_CONFIG.set(config).is_err() {
        tracing::warn!("viewer already configured, keeping the first configuration");
    }
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    let config = LAUNCH_CONFIG.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("Boids Lab")
        .size(config.width as u32, config.height as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_exited(input::mouse_exited)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let simulation = Simulation::new(config).expect("configuration is validated before launch");

    Model {
        simulation,
        egui,
        display: DisplaySettings::default(),
        frame_stats: FrameStats::default(),
        tick_accumulator: Duration::ZERO,
        tick_step: Duration::from_secs_f32(1.0 / TICK_RATE),
        last_update_time: Instant::now(),
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.frame_stats.fps = app.fps();
    model.frame_stats.frame_time = update.since_last;

    let actions = ui::update_ui(&mut model.egui, &model.simulation, &mut model.display, &model.frame_stats);
    for action in actions {
        action.apply(&mut model.simulation);
    }

    let now = Instant::now();
    model.tick_accumulator += now.duration_since(model.last_update_time);
    model.last_update_time = now;

    if model.simulation.is_paused() {
        model.tick_accumulator = Duration::ZERO;
        model.frame_stats.ticks_per_frame = 0;
        return;
    }

    let mut ticks = 0;
    while model.tick_accumulator >= model.tick_step && ticks < MAX_TICKS_PER_FRAME {
        model.simulation.tick();
        model.tick_accumulator -= model.tick_step;
        ticks += 1;
    }
    if ticks == MAX_TICKS_PER_FRAME {
        model.tick_accumulator = Duration::ZERO;
    }
    model.frame_stats.ticks_per_frame = ticks;
}
