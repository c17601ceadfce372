//! Seeded noise heightfields.
//!
//! Generators only ever see a [`TerrainOracle`](crate::terrain::TerrainOracle);
//! this module gives the CLI and end-to-end tests something realistic to hand
//! them. A flat grid fixes the world layout first, then every cell is lifted
//! by a fractal noise source sampled at its world position, so the same seed
//! gives the same landscape whatever the grid resolution.

use crate::errors::{RoadNetError, RoadNetResult};
use crate::pathfinding::GridNode;
use crate::terrain::TerrainData;
use crate::terrain::coordinates::grid_to_world;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti};

const LACUNARITY: f64 = 2.0;
const PERSISTENCE: f64 = 0.5;

/// Surface character of a synthetic heightfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relief {
    Flat,
    /// Fractal Brownian motion over Perlin noise
    Rolling,
    /// Ridged multifractal; a negative amplitude carves valleys instead
    Ridged,
}

/// Height scale, feature size and detail of a noise surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseShape {
    pub amplitude: f32,
    /// Cycles per world unit
    pub frequency: f32,
    pub octaves: u32,
}

const PRESETS: [(&str, Relief, NoiseShape); 4] = [
    (
        "flat",
        Relief::Flat,
        NoiseShape {
            amplitude: 0.0,
            frequency: 0.0,
            octaves: 1,
        },
    ),
    (
        "hills",
        Relief::Rolling,
        NoiseShape {
            amplitude: 15.0,
            frequency: 0.01,
            octaves: 4,
        },
    ),
    (
        "mountains",
        Relief::Ridged,
        NoiseShape {
            amplitude: 20.0,
            frequency: 0.005,
            octaves: 5,
        },
    ),
    (
        "valleys",
        Relief::Ridged,
        NoiseShape {
            amplitude: -20.0,
            frequency: 0.008,
            octaves: 4,
        },
    ),
];

/// Names accepted by [`TerrainRecipe::preset`]
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, ..)| *name)
}

/// Everything needed to rebuild one synthetic terrain
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainRecipe {
    pub seed: u32,
    pub relief: Relief,
    pub shape: NoiseShape,
}

impl TerrainRecipe {
    pub fn new(seed: u32, relief: Relief, shape: NoiseShape) -> Self {
        Self {
            seed,
            relief,
            shape,
        }
    }

    pub fn preset(name: &str, seed: u32) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, ..)| *preset == name)
            .map(|&(_, relief, shape)| Self::new(seed, relief, shape))
    }

    /// Sample a `width` x `height` heightfield with `scale` world units per cell
    pub fn generate(&self, width: u32, height: u32, scale: f32) -> RoadNetResult<TerrainData> {
        let mut terrain = TerrainData::create_flat(width, height, scale, 0.0)?;
        let Some(source) = self.source()? else {
            return Ok(terrain);
        };

        let amplitude = f64::from(self.shape.amplitude);
        let heights: Vec<f32> = (0..height)
            .flat_map(|z| (0..width).map(move |x| GridNode::new(x, z)))
            .map(|node| {
                let world = grid_to_world(&terrain, node);
                (source.get([f64::from(world.x), f64::from(world.y)]) * amplitude) as f32
            })
            .collect();

        terrain.heights = heights;
        Ok(terrain)
    }

    fn source(&self) -> RoadNetResult<Option<Box<dyn NoiseFn<f64, 2>>>> {
        if self.relief == Relief::Flat {
            return Ok(None);
        }

        let NoiseShape {
            amplitude,
            frequency,
            octaves,
        } = self.shape;
        if !amplitude.is_finite() || !frequency.is_finite() || frequency <= 0.0 {
            return Err(RoadNetError::configuration(format!(
                "noise needs a finite amplitude and a positive frequency, got {amplitude} and {frequency}"
            )));
        }

        let octaves = octaves as usize;
        let frequency = f64::from(frequency);
        let source: Box<dyn NoiseFn<f64, 2>> = match self.relief {
            Relief::Rolling => Box::new(
                Fbm::<Perlin>::new(self.seed)
                    .set_octaves(octaves)
                    .set_frequency(frequency)
                    .set_lacunarity(LACUNARITY)
                    .set_persistence(PERSISTENCE),
            ),
            Relief::Ridged => Box::new(
                RidgedMulti::<Perlin>::new(self.seed)
                    .set_octaves(octaves)
                    .set_frequency(frequency)
                    .set_lacunarity(LACUNARITY),
            ),
            Relief::Flat => return Ok(None),
        };
        Ok(Some(source))
    }
}
