use super::constants::FALLBACK_TERRAIN_HEIGHT;
use super::{TerrainBounds, TerrainOracle};
use crate::errors::{RoadNetError, RoadNetResult};
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Terrain heightmap sampled on a regular grid, centered on the world origin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TerrainData {
    #[validate(range(min = 2, max = 4096))]
    pub width: u32,
    #[validate(range(min = 2, max = 4096))]
    pub height: u32,
    pub heights: Vec<f32>, // Flattened 2D array (row-major)
    #[validate(range(min = 0.01, max = 1000.0))]
    pub scale: f32, // World units per grid cell
}

impl TerrainData {
    /// Create a new terrain data with validation
    pub fn new(width: u32, height: u32, heights: Vec<f32>, scale: f32) -> RoadNetResult<Self> {
        let expected_size = width as usize * height as usize;
        if heights.len() != expected_size {
            return Err(RoadNetError::configuration(format!(
                "Heights array size {} does not match terrain dimensions {}x{} (expected {})",
                heights.len(),
                width,
                height,
                expected_size
            )));
        }

        let terrain = Self {
            width,
            height,
            heights,
            scale,
        };

        terrain
            .validate()
            .map_err(|errors| RoadNetError::from_validation(&errors))?;

        Ok(terrain)
    }

    /// Create flat terrain for testing
    pub fn create_flat(
        width: u32,
        height: u32,
        scale: f32,
        base_height: f32,
    ) -> RoadNetResult<Self> {
        let heights = vec![base_height; width as usize * height as usize];
        Self::new(width, height, heights, scale)
    }

    /// Get height at exact grid position (no interpolation)
    pub fn get_height_at_grid(&self, x: u32, z: u32) -> Option<f32> {
        if x >= self.width || z >= self.height {
            return None;
        }
        let index = (z * self.width + x) as usize;
        self.heights.get(index).copied()
    }

    /// Convert world coordinates to fractional grid coordinates
    pub fn world_to_grid(&self, world_x: f32, world_z: f32) -> (f32, f32) {
        let center_x_offset = self.width as f32 * self.scale / 2.0;
        let center_z_offset = self.height as f32 * self.scale / 2.0;

        let grid_x = (world_x + center_x_offset) / self.scale;
        let grid_z = (world_z + center_z_offset) / self.scale;
        (grid_x, grid_z)
    }

    /// Convert fractional grid coordinates to world coordinates
    pub fn grid_to_world(&self, grid_x: f32, grid_z: f32) -> Vec2 {
        let center_x_offset = self.width as f32 * self.scale / 2.0;
        let center_z_offset = self.height as f32 * self.scale / 2.0;

        Vec2::new(
            grid_x * self.scale - center_x_offset,
            grid_z * self.scale - center_z_offset,
        )
    }

    /// Get interpolated height at world position using bilinear interpolation
    pub fn get_height_at_world_interpolated(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let (grid_x, grid_z) = self.world_to_grid(world_x, world_z);

        // Need one cell of margin on the far side to interpolate
        if grid_x < 0.0
            || grid_z < 0.0
            || grid_x >= (self.width - 1) as f32
            || grid_z >= (self.height - 1) as f32
        {
            return None;
        }

        let x0 = grid_x.floor() as u32;
        let z0 = grid_z.floor() as u32;
        let fx = grid_x.fract();
        let fz = grid_z.fract();

        let h00 = self.get_height_at_grid(x0, z0)?;
        let h10 = self.get_height_at_grid(x0 + 1, z0)?;
        let h01 = self.get_height_at_grid(x0, z0 + 1)?;
        let h11 = self.get_height_at_grid(x0 + 1, z0 + 1)?;

        let h0 = h00 * (1.0 - fx) + h10 * fx;
        let h1 = h01 * (1.0 - fx) + h11 * fx;

        Some(h0 * (1.0 - fz) + h1 * fz)
    }

    /// Get height at world position using nearest neighbor
    pub fn get_height_at_world_nearest(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let (grid_x, grid_z) = self.world_to_grid(world_x, world_z);
        let x = grid_x.round();
        let z = grid_z.round();
        if x < 0.0 || z < 0.0 {
            return None;
        }
        self.get_height_at_grid(x as u32, z as u32)
    }

    /// Slope angle in degrees at a grid cell, from central differences
    pub fn slope_degrees_at_grid(&self, x: u32, z: u32) -> f32 {
        let sample = |gx: u32, gz: u32| self.get_height_at_grid(gx, gz).unwrap_or(FALLBACK_TERRAIN_HEIGHT);

        let x_lo = x.saturating_sub(1);
        let x_hi = (x + 1).min(self.width - 1);
        let z_lo = z.saturating_sub(1);
        let z_hi = (z + 1).min(self.height - 1);

        let dx = (sample(x_hi, z) - sample(x_lo, z)) / ((x_hi - x_lo).max(1) as f32 * self.scale);
        let dz = (sample(x, z_hi) - sample(x, z_lo)) / ((z_hi - z_lo).max(1) as f32 * self.scale);

        (dx * dx + dz * dz).sqrt().atan().to_degrees()
    }
}

impl TerrainOracle for TerrainData {
    fn height(&self, x: f32, z: f32) -> f32 {
        self.get_height_at_world_interpolated(x, z)
            .or_else(|| self.get_height_at_world_nearest(x, z))
            .unwrap_or(FALLBACK_TERRAIN_HEIGHT)
    }

    fn steepness(&self, normalized_x: f32, normalized_z: f32) -> f32 {
        let x = (normalized_x.clamp(0.0, 1.0) * (self.width - 1) as f32).round() as u32;
        let z = (normalized_z.clamp(0.0, 1.0) * (self.height - 1) as f32).round() as u32;
        self.slope_degrees_at_grid(x, z)
    }

    fn bounds(&self) -> TerrainBounds {
        TerrainBounds::new(
            self.grid_to_world(0.0, 0.0),
            self.grid_to_world((self.width - 1) as f32, (self.height - 1) as f32),
        )
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
