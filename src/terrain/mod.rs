//! Terrain access for the road generators.
//!
//! Generators never look at heightmaps directly. They query a
//! [`TerrainOracle`]: elevation at a world position, steepness at a
//! normalized position, the world bounds and the sampling resolution used to
//! lay a cost grid over the surface.

use crate::errors::{RoadNetError, RoadNetResult};
use bevy::math::Vec2;

pub mod constants;
pub mod coordinates;
pub mod heightfield;

pub use heightfield::TerrainData;

/// Height and slope queries over a bounded surface
pub trait TerrainOracle {
    /// Elevation at world position (x, z)
    fn height(&self, x: f32, z: f32) -> f32;

    /// Steepness in degrees at a normalized position, both axes in [0, 1]
    fn steepness(&self, normalized_x: f32, normalized_z: f32) -> f32;

    /// Inclusive world-space extent of the surface
    fn bounds(&self) -> TerrainBounds;

    /// Sampling grid (width, height) used for cost maps
    fn resolution(&self) -> (u32, u32);
}

/// Axis-aligned world extent in the x/z plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl TerrainBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }

    fn is_well_formed(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.max.x > self.min.x
            && self.max.y > self.min.y
    }
}

/// Reject oracles no generator can work with.
///
/// Both resolution axes need at least two samples so normalized coordinates
/// are defined, and the bounds must be finite with a positive extent.
pub fn validate_oracle<O: TerrainOracle + ?Sized>(oracle: &O) -> RoadNetResult<()> {
    let (width, height) = oracle.resolution();
    if width < 2 || height < 2 {
        return Err(RoadNetError::configuration(format!(
            "terrain resolution {width}x{height} is too small (need at least 2x2)"
        )));
    }

    let bounds = oracle.bounds();
    if !bounds.is_well_formed() {
        return Err(RoadNetError::configuration(format!(
            "terrain bounds {:?}..{:?} are empty or not finite",
            bounds.min, bounds.max
        )));
    }

    Ok(())
}

/// Unwrap an optional oracle, validating it on the way
pub fn require_oracle(oracle: Option<&dyn TerrainOracle>) -> RoadNetResult<&dyn TerrainOracle> {
    let oracle = oracle.ok_or_else(|| RoadNetError::configuration("no terrain oracle supplied"))?;
    validate_oracle(oracle)?;
    Ok(oracle)
}
