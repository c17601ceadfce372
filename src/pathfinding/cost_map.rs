use super::GridNode;
use crate::errors::RoadNetResult;
use crate::terrain::coordinates::grid_to_normalized;
use crate::terrain::{TerrainOracle, validate_oracle};
use bevy::log::debug;

/// Dense traversal-cost grid derived from terrain steepness
#[derive(Debug, Clone, PartialEq)]
pub struct CostMap {
    pub width: u32,
    pub height: u32,
    costs: Vec<f32>, // Flattened 2D array (row-major)
}

impl CostMap {
    /// A map where every cell costs the same
    pub fn uniform(width: u32, height: u32, cost: f32) -> Self {
        Self {
            width,
            height,
            costs: vec![cost; (width * height) as usize],
        }
    }

    /// Build from explicit row-major costs; `None` when the size is wrong
    pub fn from_costs(width: u32, height: u32, costs: Vec<f32>) -> Option<Self> {
        if costs.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            costs,
        })
    }

    pub fn contains(&self, node: GridNode) -> bool {
        node.x < self.width && node.z < self.height
    }

    /// Traversal cost of a cell; anything outside the grid is impassable
    pub fn cost(&self, x: i64, z: i64) -> f32 {
        if x < 0 || z < 0 || x >= self.width as i64 || z >= self.height as i64 {
            return f32::INFINITY;
        }
        self.costs[(z as u64 * self.width as u64 + x as u64) as usize]
    }

    pub fn cost_at(&self, node: GridNode) -> f32 {
        self.cost(node.x as i64, node.z as i64)
    }

    #[cfg(test)]
    pub(crate) fn set_cost(&mut self, node: GridNode, cost: f32) {
        if self.contains(node) {
            let index = (node.z * self.width + node.x) as usize;
            self.costs[index] = cost;
        }
    }

    pub fn cell_count(&self) -> usize {
        self.costs.len()
    }
}

/// Sample the oracle's steepness at every grid cell and use it as cost
pub fn build_cost_map<O: TerrainOracle + ?Sized>(oracle: &O) -> RoadNetResult<CostMap> {
    validate_oracle(oracle)?;

    let (width, height) = oracle.resolution();
    let mut costs = Vec::with_capacity(width as usize * height as usize);

    for z in 0..height {
        for x in 0..width {
            let normalized = grid_to_normalized(oracle, GridNode::new(x, z));
            costs.push(oracle.steepness(normalized.x, normalized.y));
        }
    }

    debug!("Built {}x{} cost map", width, height);

    Ok(CostMap {
        width,
        height,
        costs,
    })
}
