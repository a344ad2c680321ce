/*
 * Neighbor Module
 *
 * Neighbor discovery for one boid: every other boid whose squared distance is
 * strictly below radius^2, tagged with that squared distance.
 *
 * Two indexes return the same set:
 * - BruteForce scans the whole population (O(n) per boid, O(n^2) per tick)
 * - Grid buckets boids into cells at least `radius` wide and only scans the
 *   cells a query can reach
 *
 * Both return neighbors ordered by boid index, so force sums are identical
 * whichever index produced them.
 */

use nannou::prelude::*;

use crate::boid::{Boid, Neighbor};

// Cells never shrink below this, so a tiny radius cannot explode the grid
const MIN_CELL_SIZE: f32 = 4.0;

#[inline]
fn neighbor_entry(index: usize, me: Point2, other: &Boid, radius_squared: f32) -> Option<Neighbor> {
    let distance_squared = me.distance_squared(other.position);
    (distance_squared < radius_squared).then(|| Neighbor {
        index,
        distance_squared,
        position: other.position,
        velocity: other.velocity,
    })
}

// Brute-force scan of the full population
pub fn find_neighbors(index: usize, boids: &[Boid], radius: f32) -> Vec<Neighbor> {
    let me = boids[index].position;
    let radius_squared = radius * radius;

    boids
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .filter_map(|(j, other)| neighbor_entry(j, me, other, radius_squared))
        .collect()
}

pub struct SpatialGrid {
    pub cell_size: f32,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Vec<usize>>,
}

// (cell_size, cols, rows) of a grid covering a width x height world
fn grid_dimensions(cell_size: f32, width: f32, height: f32) -> (f32, usize, usize) {
    let cell_size = if cell_size.is_finite() { cell_size.max(MIN_CELL_SIZE) } else { MIN_CELL_SIZE };
    let cols = ((width / cell_size).ceil() as usize).max(1);
    let rows = ((height / cell_size).ceil() as usize).max(1);
    (cell_size, cols, rows)
}

impl SpatialGrid {
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        let (cell_size, cols, rows) = grid_dimensions(cell_size, width, height);

        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    // Cell coordinates for a world position. Positions off the grid clamp to
    // the edge cells; clamping never moves two points further apart in cell
    // space, so queries stay exact.
    #[inline]
    fn cell_coords(&self, position: Point2) -> (usize, usize) {
        let col = (position.x / self.cell_size).floor().clamp(0.0, (self.cols - 1) as f32) as usize;
        let row = (position.y / self.cell_size).floor().clamp(0.0, (self.rows - 1) as f32) as usize;
        (col, row)
    }

    #[inline]
    fn cell_index(&self, position: Point2) -> usize {
        let (col, row) = self.cell_coords(position);
        row * self.cols + col
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub fn insert(&mut self, boid_index: usize, position: Point2) {
        let cell = self.cell_index(position);
        self.cells[cell].push(boid_index);
    }

    pub fn remove(&mut self, boid_index: usize, position: Point2) {
        let cell = self.cell_index(position);
        if let Some(slot) = self.cells[cell].iter().position(|&i| i == boid_index) {
            self.cells[cell].swap_remove(slot);
        }
    }

    // Move a boid between cells after it changed position
    pub fn relocate(&mut self, boid_index: usize, from: Point2, to: Point2) {
        if self.cell_index(from) != self.cell_index(to) {
            self.remove(boid_index, from);
            self.insert(boid_index, to);
        }
    }

    pub fn rebuild(&mut self, boids: &[Boid]) {
        self.clear();
        for (i, boid) in boids.iter().enumerate() {
            self.insert(i, boid.position);
        }
    }

    pub fn query(&self, index: usize, boids: &[Boid], radius: f32) -> Vec<Neighbor> {
        let me = boids[index].position;
        let radius_squared = radius * radius;
        let (col, row) = self.cell_coords(me);

        // How many rings of cells a radius can reach
        let reach = (radius.abs() / self.cell_size).ceil() as isize;
        let col_range = (col as isize - reach).max(0)..=(col as isize + reach).min(self.cols as isize - 1);
        let row_range = (row as isize - reach).max(0)..=(row as isize + reach).min(self.rows as isize - 1);

        let mut result = Vec::new();
        for r in row_range {
            let row_offset = r as usize * self.cols;
            for c in col_range.clone() {
                for &j in &self.cells[row_offset + c as usize] {
                    if j == index {
                        continue;
                    }
                    if let Some(neighbor) = neighbor_entry(j, me, &boids[j], radius_squared) {
                        result.push(neighbor);
                    }
                }
            }
        }

        result.sort_unstable_by_key(|n| n.index);
        result
    }
}

pub enum NeighborIndex {
    BruteForce,
    Grid(SpatialGrid),
}

impl NeighborIndex {
    pub fn new(use_grid: bool, radius: f32, width: f32, height: f32) -> Self {
        if use_grid {
            NeighborIndex::Grid(SpatialGrid::new(radius, width, height))
        } else {
            NeighborIndex::BruteForce
        }
    }

    // Refill the index from the current positions, resizing the grid if the
    // radius no longer matches its cells
    pub fn rebuild(&mut self, boids: &[Boid], radius: f32, width: f32, height: f32) {
        if let NeighborIndex::Grid(grid) = self {
            if grid_dimensions(radius, width, height) != (grid.cell_size, grid.cols, grid.rows) {
                *grid = SpatialGrid::new(radius, width, height);
            }
            grid.rebuild(boids);
        }
    }

    pub fn query(&self, index: usize, boids: &[Boid], radius: f32) -> Vec<Neighbor> {
        match self {
            NeighborIndex::BruteForce => find_neighbors(index, boids, radius),
            NeighborIndex::Grid(grid) => grid.query(index, boids, radius),
        }
    }

    pub fn relocate(&mut self, boid_index: usize, from: Point2, to: Point2) {
        if let NeighborIndex::Grid(grid) = self {
            grid.relocate(boid_index, from, to);
        }
    }
}
