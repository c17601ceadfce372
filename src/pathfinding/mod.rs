//! Grid pathfinding over terrain cost maps.

pub mod astar;
pub mod cost_map;

pub use astar::{GridPath, find_path};
pub use cost_map::{CostMap, build_cost_map};

use crate::terrain::constants::{ASTAR_CARDINAL_COST, ASTAR_DIAGONAL_COST};

/// Offsets of the 8-connected neighbourhood, in the order A* expands them
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// A single cell of a cost grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridNode {
    pub x: u32,
    pub z: u32,
}

impl GridNode {
    pub fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Neighbour at the given offset, if it stays inside a width x height grid
    pub fn offset(&self, dx: i32, dz: i32, grid_width: u32, grid_height: u32) -> Option<GridNode> {
        let x = self.x as i64 + dx as i64;
        let z = self.z as i64 + dz as i64;
        if x < 0 || z < 0 || x >= grid_width as i64 || z >= grid_height as i64 {
            return None;
        }
        Some(GridNode::new(x as u32, z as u32))
    }

    /// Octile distance: diagonal moves first, then straight
    pub fn octile_distance(&self, other: &GridNode) -> f32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        let diagonal = dx.min(dz) as f32;
        let straight = dx.abs_diff(dz) as f32;
        ASTAR_DIAGONAL_COST * diagonal + ASTAR_CARDINAL_COST * straight
    }
}

/// Cost of moving by (dx, dz) before terrain cost is added
pub fn step_cost(dx: i32, dz: i32) -> f32 {
    if dx != 0 && dz != 0 {
        ASTAR_DIAGONAL_COST
    } else {
        ASTAR_CARDINAL_COST
    }
}
