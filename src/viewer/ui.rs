/*
 * UI Module
 *
 * The egui control panel. The panel only reads the simulation; every
 * change the user makes comes back as a UiAction that the update loop
 * applies after the frame's UI pass, so all engine mutation goes through
 * the Simulation API.
 */

use nannou_egui::{egui, Egui};

use boids_lab::{BoundaryMode, ParamKey, PointerMode, Preset, Simulation, UpdateOrder};

use super::{DisplaySettings, FrameStats};

const MAX_BOIDS: usize = 2000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiAction {
    SetParam(ParamKey, f32),
    SetBoidCount(usize),
    Reset,
    TogglePause,
    SetBoundaryMode(BoundaryMode),
    SetPointerMode(PointerMode),
    ClearObstacles,
    Preset(Preset),
    SetTrails(bool),
    SetDensity(bool),
    SetUpdateOrder(UpdateOrder),
    SetParallel(bool),
    SetSpatialGrid(bool),
}

impl UiAction {
    pub fn apply(self, simulation: &mut Simulation) {
        match self {
            UiAction::SetParam(key, value) => {
                simulation.set_param(key, value);
            }
            UiAction::SetBoidCount(count) => simulation.set_boid_count(count),
            UiAction::Reset => simulation.reset(),
            UiAction::TogglePause => {
                simulation.toggle_pause();
            }
            UiAction::SetBoundaryMode(mode) => {
                simulation.set_boundary_mode(mode);
            }
            UiAction::SetPointerMode(mode) => {
                simulation.set_pointer_mode(mode);
            }
            UiAction::ClearObstacles => simulation.clear_obstacles(),
            UiAction::Preset(preset) => simulation.apply_preset(preset),
            UiAction::SetTrails(enabled) => simulation.set_trails_enabled(enabled),
            UiAction::SetDensity(enabled) => simulation.set_density_enabled(enabled),
            UiAction::SetUpdateOrder(order) => simulation.set_update_order(order),
            UiAction::SetParallel(parallel) => simulation.set_parallel(parallel),
            UiAction::SetSpatialGrid(enabled) => simulation.set_spatial_grid(enabled),
        }
    }
}

fn param_label(key: ParamKey) -> &'static str {
    match key {
        ParamKey::SeparationWeight => "Separation",
        ParamKey::AlignmentWeight => "Alignment",
        ParamKey::CohesionWeight => "Cohesion",
        ParamKey::NeighborRadius => "Neighbor Radius",
        ParamKey::MaxSpeed => "Max Speed",
        ParamKey::MaxForce => "Max Force",
    }
}

// Build the panel for this frame and collect what the user changed
pub fn update_ui(
    egui: &mut Egui,
    simulation: &Simulation,
    display: &mut DisplaySettings,
    frame_stats: &FrameStats,
) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flocking", |ui| {
                let params = simulation.params();
                for key in ParamKey::ALL {
                    let mut value = params.get(key);
                    if ui
                        .add(egui::Slider::new(&mut value, key.range()).text(param_label(key)))
                        .changed()
                    {
                        actions.push(UiAction::SetParam(key, value));
                    }
                }

                ui.horizontal(|ui| {
                    for preset in Preset::ALL {
                        if ui.button(preset.label()).clicked() {
                            actions.push(UiAction::Preset(preset));
                        }
                    }
                });
            });

            ui.collapsing("Boids", |ui| {
                let mut count = simulation.boids().len();
                if ui
                    .add(egui::Slider::new(&mut count, 0..=MAX_BOIDS).text("Number of Boids"))
                    .changed()
                {
                    actions.push(UiAction::SetBoidCount(count));
                }
                if ui.button("Reset Boids").clicked() {
                    actions.push(UiAction::Reset);
                }
            });

            ui.collapsing("Environment", |ui| {
                let mut boundary = simulation.boundary_mode();
                ui.horizontal(|ui| {
                    ui.label("Edges:");
                    ui.selectable_value(&mut boundary, BoundaryMode::Wrap, BoundaryMode::Wrap.label());
                    ui.selectable_value(&mut boundary, BoundaryMode::Bounce, BoundaryMode::Bounce.label());
                });
                if boundary != simulation.boundary_mode() {
                    actions.push(UiAction::SetBoundaryMode(boundary));
                }

                let current = simulation.pointer().mode;
                let mut pointer = current;
                ui.horizontal(|ui| {
                    ui.label("Pointer:");
                    for mode in [PointerMode::Off, PointerMode::Attract, PointerMode::Repel] {
                        ui.selectable_value(&mut pointer, mode, mode.label());
                    }
                });
                if pointer != current {
                    actions.push(UiAction::SetPointerMode(pointer));
                }

                ui.add(egui::Slider::new(&mut display.obstacle_radius, 10.0..=80.0).text("Obstacle Radius"));
                ui.label(format!("Obstacles: {}", simulation.obstacles().len()));
                if ui.button("Clear Obstacles").clicked() {
                    actions.push(UiAction::ClearObstacles);
                }
            });

            ui.collapsing("Display", |ui| {
                let mut trails = simulation.trails_enabled();
                if ui.checkbox(&mut trails, "Trails").changed() {
                    actions.push(UiAction::SetTrails(trails));
                }
                let mut density = simulation.density_enabled();
                if ui.checkbox(&mut density, "Density Map").changed() {
                    actions.push(UiAction::SetDensity(density));
                }
                ui.add(egui::Slider::new(&mut display.heatmap_intensity, 0.1..=1.0).text("Density Intensity"));
                ui.checkbox(&mut display.color_by_speed, "Color by Speed");
            });

            ui.collapsing("Performance Tuning", |ui| {
                let config = simulation.config();

                let mut order = config.update_order;
                ui.horizontal(|ui| {
                    ui.label("Update:");
                    ui.selectable_value(&mut order, UpdateOrder::Sequential, "Sequential");
                    ui.selectable_value(&mut order, UpdateOrder::Simultaneous, "Simultaneous");
                });
                if order != config.update_order {
                    actions.push(UiAction::SetUpdateOrder(order));
                }

                // Sequential ticks never use the thread pool
                let mut parallel = config.parallel;
                if ui
                    .add_enabled(
                        order.allows_parallel(),
                        egui::Checkbox::new(&mut parallel, "Enable Parallel Processing"),
                    )
                    .changed()
                {
                    actions.push(UiAction::SetParallel(parallel));
                }
                let mut grid = config.spatial_grid;
                if ui.checkbox(&mut grid, "Enable Spatial Grid").changed() {
                    actions.push(UiAction::SetSpatialGrid(grid));
                }

                ui.separator();

                let stats = simulation.stats();
                ui.label(format!("FPS: {:.1}", frame_stats.fps));
                ui.label(format!("Frame time: {:.2} ms", frame_stats.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Ticks this frame: {}", frame_stats.ticks_per_frame));
                ui.label(format!("Boids: {}", stats.boid_count));
                ui.label(format!("Avg speed: {:.2}", stats.avg_speed));
                ui.label(format!("Avg neighbors: {:.1}", stats.avg_neighbors));
            });

            let mut paused = simulation.is_paused();
            if ui.checkbox(&mut paused, "Pause Simulation").changed() {
                actions.push(UiAction::TogglePause);
            }
        });

    actions
}
