/*
 * Simulation Module
 *
 * The engine: owns the boids, obstacles, pointer, parameters, density field
 * and trails, and advances all of them one tick per `tick()` call. Nothing
 * here knows about wall-clock time; whatever drives the engine decides when
 * to tick.
 *
 * Per tick:
 * 1. Neighbor caches are rebuilt
 * 2. Flocking rules and environment forces are summed into each boid
 * 3. Boids integrate and the boundary mode is applied
 * 4. Trails, the density field and the statistics are sampled
 *
 * The update order is configurable, see `UpdateOrder`.
 */

use nannou::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::boid::{Boid, Neighbor};
use crate::boundary::BoundaryMode;
use crate::config::{EnvironmentConfig, SimulationConfig, UpdateOrder};
use crate::error::ConfigError;
use crate::forces::{obstacle_avoidance, pointer_force, Obstacle, Pointer, PointerMode};
use crate::heatmap::Heatmap;
use crate::neighbors::NeighborIndex;
use crate::params::{ParamKey, Preset, SimulationParams};
use crate::trail::Trail;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub position: Point2,
    pub velocity: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub boid_count: usize,
    pub avg_speed: f32,
    pub avg_neighbors: f32,
}

impl Stats {
    pub fn measure(boids: &[Boid]) -> Self {
        if boids.is_empty() {
            return Self::default();
        }

        let count = boids.len() as f32;
        let total_speed: f32 = boids.iter().map(Boid::speed).sum();
        let total_neighbors: usize = boids.iter().map(Boid::neighbor_count).sum();

        Self {
            boid_count: boids.len(),
            avg_speed: total_speed / count,
            avg_neighbors: total_neighbors as f32 / count,
        }
    }
}

// Read-only view of one tick, handed to renderers and telemetry
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub paused: bool,
    pub boundary_mode: BoundaryMode,
    pub pointer_mode: PointerMode,
    pub agents: Vec<AgentState>,
    pub stats: Stats,
}

// Everything a single boid step reads besides the boid itself
struct StepContext<'a> {
    params: &'a SimulationParams,
    obstacles: &'a [Obstacle],
    pointer: &'a Pointer,
    environment: &'a EnvironmentConfig,
    boundary_mode: BoundaryMode,
    width: f32,
    height: f32,
}

impl StepContext<'_> {
    fn step(&self, boid: &mut Boid, neighbors: Vec<Neighbor>) {
        boid.set_neighbors(neighbors);

        let force = boid.flocking_force(self.params)
            + obstacle_avoidance(
                boid.position,
                self.obstacles,
                self.environment.obstacle_buffer,
                self.environment.avoidance_strength,
            )
            + pointer_force(boid.position, self.pointer);

        boid.apply_force(force);
        boid.update(self.params.max_speed);
        self.boundary_mode.apply(boid, self.width, self.height);
    }
}

pub struct Simulation {
    config: SimulationConfig,
    params: SimulationParams,
    boids: Vec<Boid>,
    obstacles: Vec<Obstacle>,
    pointer: Pointer,
    boundary_mode: BoundaryMode,
    paused: bool,
    heatmap: Heatmap,
    density_enabled: bool,
    trails: Vec<Trail>,
    trails_enabled: bool,
    neighbor_index: NeighborIndex,
    stats: Stats,
    tick_count: u64,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let heatmap = Heatmap::new(
            config.width,
            config.height,
            config.density.resolution,
            config.density.decay,
            config.density.floor,
        );
        let neighbor_index = NeighborIndex::new(
            config.spatial_grid,
            config.params.neighbor_radius,
            config.width,
            config.height,
        );

        let mut simulation = Self {
            params: config.params,
            boids: Vec::new(),
            obstacles: Vec::new(),
            pointer: Pointer::new(config.environment.pointer_radius, config.environment.pointer_strength),
            boundary_mode: config.boundary_mode,
            paused: false,
            heatmap,
            density_enabled: config.density.enabled,
            trails: Vec::new(),
            trails_enabled: config.trails.enabled,
            neighbor_index,
            stats: Stats::default(),
            tick_count: 0,
            rng,
            config,
        };
        simulation.reset();
        Ok(simulation)
    }

    // Respawn the configured number of boids and clear trails, density and stats
    pub fn reset(&mut self) {
        let SimulationConfig {
            width,
            height,
            boid_count,
            initial_speed_min,
            initial_speed_max,
            ..
        } = self.config;

        let rng = &mut self.rng;
        self.boids = (0..boid_count)
            .map(|_| Boid::random(&mut *rng, width, height, initial_speed_min, initial_speed_max))
            .collect();
        self.trails = vec![Trail::new(self.config.trails.capacity); boid_count];
        self.heatmap.reset();
        self.stats = Stats {
            boid_count,
            ..Stats::default()
        };
        self.tick_count = 0;

        info!(boids = boid_count, width, height, "simulation reset");
    }

    pub fn set_boid_count(&mut self, count: usize) {
        if count != self.config.boid_count {
            self.config.boid_count = count;
            self.reset();
        }
    }

    // Advance one tick. Returns false, leaving every piece of state alone,
    // while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }

        let radius = self.params.neighbor_radius;
        let (width, height) = (self.config.width, self.config.height);
        self.neighbor_index.rebuild(&self.boids, radius, width, height);

        let ctx = StepContext {
            params: &self.params,
            obstacles: &self.obstacles,
            pointer: &self.pointer,
            environment: &self.config.environment,
            boundary_mode: self.boundary_mode,
            width,
            height,
        };

        match self.config.update_order {
            UpdateOrder::Sequential => {
                for i in 0..self.boids.len() {
                    let neighbors = self.neighbor_index.query(i, &self.boids, radius);
                    let from = self.boids[i].position;
                    ctx.step(&mut self.boids[i], neighbors);
                    self.neighbor_index.relocate(i, from, self.boids[i].position);
                }
            }
            UpdateOrder::Simultaneous => {
                let parallel = self.config.runs_parallel();
                let index = &self.neighbor_index;
                let boids = &self.boids;

                // Every cache is taken from the pre-tick state before anything moves
                let caches: Vec<Vec<Neighbor>> = if parallel {
                    (0..boids.len())
                        .into_par_iter()
                        .map(|i| index.query(i, boids, radius))
                        .collect()
                } else {
                    (0..boids.len()).map(|i| index.query(i, boids, radius)).collect()
                };

                if parallel {
                    self.boids
                        .par_iter_mut()
                        .zip(caches)
                        .for_each(|(boid, neighbors)| ctx.step(boid, neighbors));
                } else {
                    for (boid, neighbors) in self.boids.iter_mut().zip(caches) {
                        ctx.step(boid, neighbors);
                    }
                }
            }
        }

        if self.trails_enabled {
            for (trail, boid) in self.trails.iter_mut().zip(&self.boids) {
                trail.push(boid.position);
            }
        }

        if self.density_enabled && self.tick_count % self.config.density.interval == 0 {
            self.heatmap.update(self.boids.iter().map(|boid| boid.position));
        }

        if self.tick_count % self.config.stats_interval == 0 {
            self.stats = Stats::measure(&self.boids);
        }

        trace!(tick = self.tick_count, "tick complete");
        self.tick_count += 1;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_count,
            paused: self.paused,
            boundary_mode: self.boundary_mode,
            pointer_mode: self.pointer.mode,
            agents: self
                .boids
                .iter()
                .map(|boid| AgentState {
                    position: boid.position,
                    velocity: boid.velocity,
                })
                .collect(),
            stats: self.stats,
        }
    }

    // Set a named parameter. Unknown names and invalid values are ignored;
    // the return value says whether anything changed.
    pub fn configure(&mut self, name: &str, value: f32) -> bool {
        match self.params.set_by_name(name, value) {
            Ok(()) => {
                debug!(param = name, value, "parameter updated");
                true
            }
            Err(err) => {
                debug!(%err, "ignoring configuration change");
                false
            }
        }
    }

    pub fn set_param(&mut self, key: ParamKey, value: f32) -> bool {
        self.configure(key.name(), value)
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        for (key, value) in preset.values() {
            self.set_param(key, value);
        }
        info!(preset = preset.label(), "preset applied");
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) -> BoundaryMode {
        self.boundary_mode = mode;
        debug!(mode = mode.label(), "boundary mode set");
        self.boundary_mode
    }

    pub fn toggle_boundary_mode(&mut self) -> BoundaryMode {
        self.set_boundary_mode(self.boundary_mode.toggled())
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        self.paused
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) -> PointerMode {
        self.pointer.mode = mode;
        debug!(mode = mode.label(), "pointer mode set");
        self.pointer.mode
    }

    pub fn cycle_pointer_mode(&mut self) -> PointerMode {
        self.set_pointer_mode(self.pointer.mode.next())
    }

    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.pointer.position = pt2(x, y);
        self.pointer.on_world =
            (0.0..=self.config.width).contains(&x) && (0.0..=self.config.height).contains(&y);
    }

    pub fn pointer_left_world(&mut self) {
        self.pointer.on_world = false;
    }

    // Returns false (and adds nothing) for a non-finite position or a
    // non-positive radius
    pub fn add_obstacle(&mut self, x: f32, y: f32, radius: f32) -> bool {
        if !(x.is_finite() && y.is_finite() && radius.is_finite() && radius > 0.0) {
            debug!(x, y, radius, "ignoring invalid obstacle");
            return false;
        }
        self.obstacles.push(Obstacle::new(x, y, radius));
        debug!(x, y, radius, count = self.obstacles.len(), "obstacle added");
        true
    }

    // Remove the obstacle whose center is nearest to (x, y), unless it is
    // further away than the pick threshold
    pub fn remove_nearest_obstacle(&mut self, x: f32, y: f32) -> Option<Obstacle> {
        let target = pt2(x, y);
        let threshold = self.config.environment.pick_threshold;

        let (index, distance) = self
            .obstacles
            .iter()
            .enumerate()
            .map(|(i, obstacle)| (i, obstacle.position.distance(target)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if distance > threshold {
            return None;
        }

        let removed = self.obstacles.remove(index);
        debug!(x = removed.position.x, y = removed.position.y, "obstacle removed");
        Some(removed)
    }

    pub fn clear_obstacles(&mut self) {
        debug!(count = self.obstacles.len(), "obstacles cleared");
        self.obstacles.clear();
    }

    // Disabling trails also clears them
    pub fn set_trails_enabled(&mut self, enabled: bool) {
        self.trails_enabled = enabled;
        if !enabled {
            self.trails.iter_mut().for_each(Trail::clear);
        }
    }

    pub fn set_density_enabled(&mut self, enabled: bool) {
        self.density_enabled = enabled;
    }

    pub fn set_update_order(&mut self, order: UpdateOrder) {
        self.config.update_order = order;
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.config.parallel = parallel;
    }

    pub fn set_spatial_grid(&mut self, enabled: bool) {
        if enabled != self.config.spatial_grid {
            self.config.spatial_grid = enabled;
            self.neighbor_index = NeighborIndex::new(
                enabled,
                self.params.neighbor_radius,
                self.config.width,
                self.config.height,
            );
        }
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    pub fn trails_enabled(&self) -> bool {
        self.trails_enabled
    }

    pub fn density_enabled(&self) -> bool {
        self.density_enabled
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }

    // Test hook: replace the population with hand-placed boids
    #[doc(hidden)]
    pub fn set_boids(&mut self, boids: Vec<Boid>) {
        self.trails = vec![Trail::new(self.config.trails.capacity); boids.len()];
        self.boids = boids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(boid_count: usize) -> Simulation {
        Simulation::new(SimulationConfig {
            boid_count,
            seed: Some(11),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn configure_ignores_unknown_and_invalid() {
        let mut sim = seeded(5);
        let before = *sim.params();

        assert!(!sim.configure("gravity", 3.0));
        assert!(!sim.configure("maxSpeed", f32::INFINITY));
        assert!(!sim.configure("neighborRadius", -1.0));
        assert_eq!(*sim.params(), before);

        assert!(sim.configure("maxSpeed", 6.0));
        assert_eq!(sim.params().max_speed, 6.0);
    }

    #[test]
    fn paused_tick_changes_nothing() {
        let mut sim = seeded(20);
        assert!(sim.toggle_pause());
        let before = sim.snapshot();

        assert!(!sim.tick());
        assert_eq!(sim.snapshot(), before);

        assert!(!sim.toggle_pause());
        assert!(sim.tick());
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn state_toggles_return_new_state() {
        let mut sim = seeded(1);
        assert_eq!(sim.toggle_boundary_mode(), BoundaryMode::Bounce);
        assert_eq!(sim.set_boundary_mode(BoundaryMode::Wrap), BoundaryMode::Wrap);
        assert_eq!(sim.cycle_pointer_mode(), PointerMode::Attract);
        assert_eq!(sim.set_pointer_mode(PointerMode::Repel), PointerMode::Repel);
        assert_eq!(sim.cycle_pointer_mode(), PointerMode::Off);
    }

    #[test]
    fn obstacle_editing() {
        let mut sim = seeded(1);
        assert!(sim.add_obstacle(100.0, 100.0, 30.0));
        assert!(sim.add_obstacle(400.0, 100.0, 20.0));
        assert!(!sim.add_obstacle(10.0, 10.0, 0.0));
        assert!(!sim.add_obstacle(f32::NAN, 10.0, 5.0));
        assert_eq!(sim.obstacles().len(), 2);

        // Too far from either center
        assert_eq!(sim.remove_nearest_obstacle(250.0, 100.0), None);

        let removed = sim.remove_nearest_obstacle(390.0, 110.0).unwrap();
        assert_eq!(removed.position, pt2(400.0, 100.0));
        assert_eq!(sim.obstacles().len(), 1);

        sim.clear_obstacles();
        assert!(sim.obstacles().is_empty());
        assert_eq!(sim.remove_nearest_obstacle(100.0, 100.0), None);
    }

    #[test]
    fn pointer_position_tracks_world_bounds() {
        let mut sim = seeded(1);
        sim.set_pointer_position(10.0, 10.0);
        assert!(sim.pointer().on_world);
        sim.set_pointer_position(-5.0, 10.0);
        assert!(!sim.pointer().on_world);
        sim.set_pointer_position(10.0, 10.0);
        sim.pointer_left_world();
        assert!(!sim.pointer().on_world);
    }

    #[test]
    fn trails_fill_and_clear() {
        let mut sim = seeded(4);
        sim.set_trails_enabled(true);
        for _ in 0..30 {
            sim.tick();
        }
        assert!(sim.trails().iter().all(|t| t.len() == sim.config().trails.capacity));

        sim.set_trails_enabled(false);
        assert!(sim.trails().iter().all(Trail::is_empty));
        sim.tick();
        assert!(sim.trails().iter().all(Trail::is_empty));
    }

    #[test]
    fn stats_sample_on_interval() {
        let mut sim = seeded(30);
        sim.tick();
        let first = sim.stats();
        assert_eq!(first.boid_count, 30);
        assert!(first.avg_speed > 0.0);

        // Ticks 1..=9 do not resample
        for _ in 0..9 {
            sim.tick();
        }
        assert_eq!(sim.stats(), first);

        sim.tick();
        assert_ne!(sim.stats(), first);
    }

    #[test]
    fn empty_population_ticks_cleanly() {
        let mut sim = seeded(0);
        assert!(sim.tick());
        assert_eq!(sim.stats(), Stats::default());
        assert!(sim.snapshot().agents.is_empty());
    }

    #[test]
    fn density_tracks_population() {
        let mut sim = seeded(50);
        sim.tick();
        let total: f32 = sim.heatmap().cells().map(|(_, _, v)| v).sum();
        // A boid wrapped onto the far edge is off the grid
        let on_grid = sim
            .boids()
            .iter()
            .filter(|boid| sim.heatmap().cell_at(boid.position).is_some())
            .count();
        assert!(on_grid >= 45);
        assert_eq!(total, on_grid as f32);
    }

    #[test]
    fn set_boid_count_respawns() {
        let mut sim = seeded(10);
        sim.tick();
        sim.set_boid_count(25);
        assert_eq!(sim.boids().len(), 25);
        assert_eq!(sim.trails().len(), 25);
        assert_eq!(sim.tick_count(), 0);
    }
}
