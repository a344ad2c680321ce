use approx::assert_relative_eq;
use nannou::prelude::*;

use boids_lab::forces::{obstacle_avoidance, pointer_force};
use boids_lab::neighbors::find_neighbors;
use boids_lab::{Boid, BoundaryMode, Obstacle, PointerMode, Preset, Simulation, SimulationConfig};

fn lone_boid_simulation(boundary_mode: BoundaryMode, boid: Boid) -> Simulation {
    let mut simulation = Simulation::new(SimulationConfig {
        width: 200.0,
        height: 100.0,
        boid_count: 0,
        seed: Some(3),
        boundary_mode,
        ..SimulationConfig::default()
    })
    .unwrap();
    simulation.set_boids(vec![boid]);
    simulation
}

#[test]
fn close_pair_separates_in_opposite_directions() {
    let mut boids = vec![
        Boid::new(pt2(0.0, 0.0), vec2(1.0, 0.0)),
        Boid::new(pt2(10.0, 0.0), vec2(1.0, 0.0)),
    ];
    for i in 0..boids.len() {
        let neighbors = find_neighbors(i, &boids, 50.0);
        boids[i].set_neighbors(neighbors);
    }

    assert_eq!(boids[0].neighbors()[0].index, 1);
    assert_eq!(boids[1].neighbors()[0].index, 0);
    assert_eq!(boids[0].neighbors()[0].distance_squared, 100.0);

    let left = boids[0].separation(1.0);
    let right = boids[1].separation(1.0);

    assert_relative_eq!(left.x, -1.0);
    assert_relative_eq!(right.x, 1.0);
    assert_relative_eq!(left.y, 0.0);
    assert_relative_eq!(left.x + right.x, 0.0);
}

#[test]
fn obstacle_below_pushes_boid_down() {
    let obstacles = [Obstacle::new(100.0, 100.0, 30.0)];
    let force = obstacle_avoidance(pt2(100.0, 150.0), &obstacles, 40.0, 0.5);

    assert_relative_eq!(force.x, 0.0);
    assert_relative_eq!(force.y, 0.5 * (1.0 - 50.0 / 70.0), epsilon = 1e-6);
}

#[test]
fn pointer_attracts_then_repels() {
    let mut simulation = lone_boid_simulation(BoundaryMode::Wrap, Boid::new(pt2(150.0, 50.0), Vec2::ZERO));
    simulation.set_pointer_position(100.0, 50.0);
    simulation.set_pointer_mode(PointerMode::Attract);

    let position = simulation.boids()[0].position;
    let attract = pointer_force(position, simulation.pointer());
    assert!(attract.x < 0.0);
    assert_relative_eq!(attract.y, 0.0);

    simulation.cycle_pointer_mode();
    let repel = pointer_force(position, simulation.pointer());
    assert_relative_eq!(repel.x, -attract.x);
    assert_relative_eq!(repel.y, -attract.y);

    simulation.pointer_left_world();
    assert_eq!(pointer_force(position, simulation.pointer()), Vec2::ZERO);
}

#[test]
fn wrap_moves_boid_across_left_edge() {
    let mut simulation = lone_boid_simulation(BoundaryMode::Wrap, Boid::new(pt2(0.5, 50.0), vec2(-1.0, 0.0)));
    assert!(simulation.tick());

    let boid = &simulation.boids()[0];
    assert_eq!(boid.position.x, 200.0);
    assert_eq!(boid.position.y, 50.0);
    assert_eq!(boid.velocity, vec2(-1.0, 0.0));
}

#[test]
fn wrapped_boid_on_far_edge_leaves_no_density() {
    let mut simulation = lone_boid_simulation(BoundaryMode::Wrap, Boid::new(pt2(0.5, 50.0), vec2(-1.0, 0.0)));
    assert!(simulation.density_enabled());
    assert!(simulation.tick());

    assert_eq!(simulation.boids()[0].position.x, 200.0);
    let total: f32 = simulation.heatmap().cells().map(|(_, _, v)| v).sum();
    assert_eq!(total, 0.0);
}

#[test]
fn bounce_reflects_velocity_at_right_edge() {
    let mut simulation =
        lone_boid_simulation(BoundaryMode::Bounce, Boid::new(pt2(199.5, 50.0), vec2(2.0, 0.0)));
    assert!(simulation.tick());

    let boid = &simulation.boids()[0];
    assert_eq!(boid.position.x, 200.0);
    assert_eq!(boid.velocity, vec2(-2.0, 0.0));
}

#[test]
fn lone_boid_coasts_unchanged() {
    let mut simulation = lone_boid_simulation(BoundaryMode::Wrap, Boid::new(pt2(50.0, 50.0), vec2(2.0, 1.0)));
    for _ in 0..10 {
        simulation.tick();
    }

    let boid = &simulation.boids()[0];
    assert_relative_eq!(boid.position.x, 70.0, epsilon = 1e-4);
    assert_relative_eq!(boid.position.y, 60.0, epsilon = 1e-4);
    assert_eq!(boid.velocity, vec2(2.0, 1.0));
    assert_eq!(boid.neighbor_count(), 0);
}

#[test]
fn presets_change_flocking_weights_only() {
    let mut simulation = Simulation::new(SimulationConfig {
        boid_count: 10,
        seed: Some(5),
        ..SimulationConfig::default()
    })
    .unwrap();
    let max_force = simulation.params().max_force;

    simulation.apply_preset(Preset::Cluster);
    let params = simulation.params();
    assert_eq!(params.cohesion_weight, 2.5);
    assert_eq!(params.neighbor_radius, 80.0);
    assert_eq!(params.max_speed, 3.0);
    assert_eq!(params.max_force, max_force);
}

#[test]
fn config_file_drives_the_engine() {
    let config = SimulationConfig::from_toml_str(
        r#"
        width = 400.0
        height = 300.0
        boid_count = 12
        seed = 9
        boundary_mode = "bounce"
        update_order = "simultaneous"

        [params]
        max_speed = 2.5
        "#,
    )
    .unwrap();

    let mut simulation = Simulation::new(config).unwrap();
    assert_eq!(simulation.boundary_mode(), BoundaryMode::Bounce);
    assert_eq!(simulation.boids().len(), 12);

    for _ in 0..50 {
        simulation.tick();
    }
    for boid in simulation.boids() {
        assert!(boid.speed() <= 2.5 + 1e-4);
        assert!((0.0..=400.0).contains(&boid.position.x));
        assert!((0.0..=300.0).contains(&boid.position.y));
    }
}

#[test]
fn sample_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/boids.toml");
    let config = SimulationConfig::load(path).unwrap();

    assert_eq!(config.boid_count, 300);
    assert!(config.spatial_grid);
    assert_eq!(config.params, boids_lab::SimulationParams::default());
}
