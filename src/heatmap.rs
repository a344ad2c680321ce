/*
 * Heatmap Module
 *
 * A decaying density grid of where boids have been. Each update multiplies
 * every cell by the decay factor, adds one per boid to the cell under it and
 * recomputes the running maximum, which never drops below `floor` so the
 * normalized values stay well defined.
 */

use nannou::prelude::*;

pub struct Heatmap {
    cells: Vec<f32>,
    width: f32,
    height: f32,
    pub resolution: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub decay: f32,
    pub floor: f32,
    max_value: f32,
}

impl Heatmap {
    pub fn new(width: f32, height: f32, resolution: usize, decay: f32, floor: f32) -> Self {
        let resolution = resolution.max(1);
        Self {
            cells: vec![0.0; resolution * resolution],
            width,
            height,
            resolution,
            cell_width: width / resolution as f32,
            cell_height: height / resolution as f32,
            decay,
            floor,
            max_value: floor,
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.resolution && j < self.resolution).then(|| j * self.resolution + i)
    }

    // Cell (column, row) containing a world position. The grid covers
    // [0, width) x [0, height); anything else, far edges included, has no cell.
    pub fn cell_at(&self, position: Point2) -> Option<(usize, usize)> {
        if !(0.0..self.width).contains(&position.x) || !(0.0..self.height).contains(&position.y) {
            return None;
        }
        let i = (position.x / self.cell_width) as usize;
        let j = (position.y / self.cell_height) as usize;
        self.index(i, j).map(|_| (i, j))
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = 0.0);
        self.max_value = self.floor;
    }

    pub fn update<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Point2>,
    {
        for cell in &mut self.cells {
            *cell *= self.decay;
        }

        for position in positions {
            if let Some((i, j)) = self.cell_at(position) {
                let index = j * self.resolution + i;
                self.cells[index] += 1.0;
            }
        }

        self.max_value = self.cells.iter().copied().fold(self.floor, f32::max);
    }

    pub fn cell_value(&self, i: usize, j: usize) -> Option<f32> {
        self.index(i, j).map(|index| self.cells[index])
    }

    pub fn normalized_value(&self, i: usize, j: usize) -> Option<f32> {
        self.cell_value(i, j).map(|value| value / self.max_value)
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    // (column, row, value) for every cell
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let resolution = self.resolution;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, &value)| (index % resolution, index / resolution, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_boids_per_cell() {
        let mut heatmap = Heatmap::new(300.0, 300.0, 3, 0.95, 1.0);
        heatmap.update(vec![pt2(10.0, 10.0), pt2(20.0, 20.0), pt2(250.0, 150.0)]);

        assert_eq!(heatmap.cell_value(0, 0), Some(2.0));
        assert_eq!(heatmap.cell_value(2, 1), Some(1.0));
        assert_eq!(heatmap.max_value(), 2.0);
        assert_eq!(heatmap.normalized_value(2, 1), Some(0.5));
    }

    #[test]
    fn ignores_positions_off_the_grid() {
        let mut heatmap = Heatmap::new(300.0, 300.0, 3, 0.95, 1.0);
        heatmap.update(vec![pt2(-1.0, 10.0), pt2(10.0, 300.5), pt2(f32::NAN, 5.0)]);
        assert!(heatmap.cells().all(|(_, _, v)| v == 0.0));
        assert_eq!(heatmap.cell_value(3, 0), None);
    }

    #[test]
    fn far_edges_are_outside_the_grid() {
        let mut heatmap = Heatmap::new(300.0, 300.0, 3, 0.95, 1.0);
        heatmap.update(vec![pt2(300.0, 50.0), pt2(0.0, 300.0), pt2(300.0, 300.0)]);
        assert!(heatmap.cells().all(|(_, _, v)| v == 0.0));
        assert_eq!(heatmap.cell_at(pt2(300.0, 50.0)), None);
        assert_eq!(heatmap.cell_at(pt2(299.9, 299.9)), Some((2, 2)));
        assert_eq!(heatmap.max_value(), 1.0);
    }

    #[test]
    fn empty_population_keeps_max_at_floor() {
        let mut heatmap = Heatmap::new(200.0, 100.0, 10, 0.9, 2.5);
        for _ in 0..8 {
            heatmap.update(std::iter::empty());
        }
        assert!(heatmap.cells().all(|(_, _, v)| v == 0.0));
        assert_eq!(heatmap.max_value(), 2.5);
    }

    #[test]
    fn decays_towards_zero_with_floored_max() {
        let mut heatmap = Heatmap::new(100.0, 100.0, 2, 0.5, 1.0);
        heatmap.update(vec![pt2(10.0, 10.0); 4]);
        assert_eq!(heatmap.max_value(), 4.0);

        for _ in 0..6 {
            heatmap.update(std::iter::empty());
        }
        assert_relative_eq!(heatmap.cell_value(0, 0).unwrap(), 4.0 / 64.0);
        assert_eq!(heatmap.max_value(), 1.0);
        assert!(heatmap.cells().all(|(_, _, v)| v >= 0.0));
    }

    #[test]
    fn reset_restores_floor() {
        let mut heatmap = Heatmap::new(100.0, 100.0, 2, 0.9, 1.5);
        heatmap.update(vec![pt2(60.0, 60.0); 3]);
        heatmap.reset();
        assert_eq!(heatmap.cell_value(1, 1), Some(0.0));
        assert_eq!(heatmap.max_value(), 1.5);
    }
}
