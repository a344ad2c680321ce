/*
 * Boid Simulation Benchmark
 *
 * Measures neighbor search (brute force against the spatial grid) and the
 * full tick under both update orders, for a range of flock sizes.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use boids_lab::neighbors::{find_neighbors, SpatialGrid};
use boids_lab::{Boid, Simulation, SimulationConfig, UpdateOrder};

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 700.0;
const RADIUS: f32 = 50.0;

fn random_flock(n: usize) -> Vec<Boid> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    (0..n).map(|_| Boid::random(&mut rng, WIDTH, HEIGHT, 2.0, 4.0)).collect()
}

fn bench_neighbor_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_search");

    for num_boids in [100, 500, 1000, 2000].iter() {
        let boids = random_flock(*num_boids);

        group.bench_with_input(BenchmarkId::new("brute_force", num_boids), &boids, |b, boids| {
            b.iter(|| {
                for i in 0..boids.len() {
                    black_box(find_neighbors(i, boids, RADIUS));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("grid", num_boids), &boids, |b, boids| {
            let mut grid = SpatialGrid::new(RADIUS, WIDTH, HEIGHT);
            b.iter(|| {
                grid.rebuild(boids);
                for i in 0..boids.len() {
                    black_box(grid.query(i, boids, RADIUS));
                }
            });
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.measurement_time(Duration::from_secs(5));

    let cases = [
        ("sequential", UpdateOrder::Sequential, false, false),
        ("sequential_grid", UpdateOrder::Sequential, false, true),
        ("simultaneous", UpdateOrder::Simultaneous, false, false),
        ("simultaneous_parallel", UpdateOrder::Simultaneous, true, true),
    ];

    for num_boids in [150, 1000].iter() {
        for (name, order, parallel, grid) in cases {
            group.bench_with_input(BenchmarkId::new(name, num_boids), num_boids, |b, &n| {
                let config = SimulationConfig {
                    boid_count: n,
                    seed: Some(42),
                    update_order: order,
                    parallel,
                    spatial_grid: grid,
                    ..SimulationConfig::default()
                };
                let mut simulation = match Simulation::new(config) {
                    Ok(simulation) => simulation,
                    Err(err) => panic!("benchmark config rejected: {err}"),
                };
                b.iter(|| black_box(simulation.tick()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_neighbor_search, bench_tick);
criterion_main!(benches);
