/*
 * Trail Module
 *
 * Fixed-capacity history of recent positions for one boid. Rendering aid
 * only; nothing here feeds back into steering.
 */

use std::collections::VecDeque;

use nannou::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<Point2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, position: Point2) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // Oldest first
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.points.iter().copied()
    }
}
