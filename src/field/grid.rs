//! Uniform spatial grid
//!
//! Buckets particle indices by cell so neighbor queries only visit the 3x3
//! block around a cell instead of every particle. With cell size equal to the
//! connection threshold, every pair closer than the threshold lands in
//! adjacent cells.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    x: i32,
    y: i32,
}

pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    fn key(&self, pos: Vec2) -> CellKey {
        CellKey {
            x: (pos.x / self.cell_size).floor() as i32,
            y: (pos.y / self.cell_size).floor() as i32,
        }
    }

    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let key = self.key(pos);
        self.cells.entry(key).or_default().push(index);
    }

    /// Build a grid over all points
    pub fn build(cell_size: f32, points: impl Iterator<Item = Vec2>) -> Self {
        let mut grid = Self::new(cell_size);
        for (i, pos) in points.enumerate() {
            grid.insert(i, pos);
        }
        grid
    }

    /// Every index in the 3x3 block of cells around `pos`
    pub fn nearby(&self, pos: Vec2) -> impl Iterator<Item = usize> + '_ {
        let key = self.key(pos);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| CellKey { x: key.x + dx, y: key.y + dy }))
            .filter_map(|k| self.cells.get(&k))
            .flat_map(|cell| cell.iter().copied())
    }
}
