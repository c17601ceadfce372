use super::TerrainOracle;
use crate::pathfinding::GridNode;
use bevy::math::{Vec2, Vec3};

/// Convert world coordinates to normalized [0, 1] coordinates of the oracle
pub fn world_to_normalized<O: TerrainOracle + ?Sized>(oracle: &O, world_x: f32, world_z: f32) -> Vec2 {
    let bounds = oracle.bounds();
    let size = bounds.size();
    Vec2::new(
        ((world_x - bounds.min.x) / size.x).clamp(0.0, 1.0),
        ((world_z - bounds.min.y) / size.y).clamp(0.0, 1.0),
    )
}

/// Normalized coordinates of a sampling-grid cell
pub fn grid_to_normalized<O: TerrainOracle + ?Sized>(oracle: &O, node: GridNode) -> Vec2 {
    let (width, height) = oracle.resolution();
    Vec2::new(
        node.x as f32 / (width.max(2) - 1) as f32,
        node.z as f32 / (height.max(2) - 1) as f32,
    )
}

/// World (x, z) position of a sampling-grid cell
pub fn grid_to_world<O: TerrainOracle + ?Sized>(oracle: &O, node: GridNode) -> Vec2 {
    let bounds = oracle.bounds();
    bounds.min + grid_to_normalized(oracle, node) * bounds.size()
}

/// World position of a grid cell with the oracle's elevation filled in
pub fn grid_to_world_3d<O: TerrainOracle + ?Sized>(oracle: &O, node: GridNode) -> Vec3 {
    let world = grid_to_world(oracle, node);
    Vec3::new(world.x, oracle.height(world.x, world.y), world.y)
}

/// Nearest sampling-grid cell of a world position, `None` outside bounds
pub fn world_to_grid<O: TerrainOracle + ?Sized>(oracle: &O, world_x: f32, world_z: f32) -> Option<GridNode> {
    if !oracle.bounds().contains(world_x, world_z) {
        return None;
    }

    let (width, height) = oracle.resolution();
    let normalized = world_to_normalized(oracle, world_x, world_z);
    let grid_x = (normalized.x * (width.max(2) - 1) as f32).round() as u32;
    let grid_z = (normalized.y * (height.max(2) - 1) as f32).round() as u32;

    Some(GridNode::new(grid_x.min(width - 1), grid_z.min(height - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainData;

    #[test]
    fn test_grid_world_round_trip_on_heightfield() {
        let terrain = TerrainData::create_flat(11, 11, 2.0, 3.0).unwrap();

        let corner = grid_to_world(&terrain, GridNode::new(0, 0));
        assert_eq!(corner, terrain.bounds().min);

        let node = GridNode::new(7, 3);
        let world = grid_to_world(&terrain, node);
        assert_eq!(world_to_grid(&terrain, world.x, world.y), Some(node));

        let world_3d = grid_to_world_3d(&terrain, node);
        assert!((world_3d.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_world_to_grid_out_of_bounds() {
        let terrain = TerrainData::create_flat(8, 8, 1.0, 0.0).unwrap();
        let bounds = terrain.bounds();
        assert!(world_to_grid(&terrain, bounds.max.x + 0.5, 0.0).is_none());
        assert!(world_to_grid(&terrain, 0.0, bounds.min.y - 0.5).is_none());
        assert_eq!(
            world_to_grid(&terrain, bounds.max.x, bounds.max.y),
            Some(GridNode::new(7, 7))
        );
    }

    #[test]
    fn test_normalized_coordinates() {
        let terrain = TerrainData::create_flat(5, 9, 1.0, 0.0).unwrap();
        let n = grid_to_normalized(&terrain, GridNode::new(4, 4));
        assert!((n.x - 1.0).abs() < 1e-6);
        assert!((n.y - 0.5).abs() < 1e-6);

        let bounds = terrain.bounds();
        let center = world_to_normalized(&terrain, bounds.center().x, bounds.center().y);
        assert!((center - Vec2::splat(0.5)).length() < 1e-5);
    }
}
