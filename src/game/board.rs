//! Fixed-size board and food placement

use glam::Vec2;
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

use super::state::Position;

/// The playing field: `width` x `height` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Pixel centre of a cell for a given cell size
    pub fn cell_center(&self, pos: Position, cell_size: u32) -> Vec2 {
        let cell = cell_size as f32;
        Vec2::new(
            pos.x as f32 * cell + cell / 2.0,
            pos.y as f32 * cell + cell / 2.0,
        )
    }

    /// Pick a free cell uniformly at random.
    ///
    /// Returns `None` when `occupied` covers the whole board.
    pub fn allocate_food<R: Rng + ?Sized>(
        &self,
        occupied: &HashSet<Position>,
        rng: &mut R,
    ) -> Option<Position> {
        self.cells()
            .filter(|pos| !occupied.contains(pos))
            .choose(rng)
    }
}
