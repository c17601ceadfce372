use bevy::log::{info, warn};
use roadnet::errors::{RoadNetError, RoadNetResult};
use roadnet::terrain_generation::{NoiseShape, Relief, TerrainRecipe, preset_names};

/// Shape used by the raw `perlin` and `ridged` terrain types before overrides
const CUSTOM_SHAPE: NoiseShape = NoiseShape {
    amplitude: 10.0,
    frequency: 0.05,
    octaves: 4,
};

/// Resolves a `--terrain-type` name plus optional noise overrides
pub struct TerrainBuilder {
    terrain_type: String,
    seed: Option<u32>,
    amplitude: Option<f32>,
    frequency: Option<f32>,
    octaves: Option<u32>,
}

impl TerrainBuilder {
    pub fn new(terrain_type: impl Into<String>) -> Self {
        Self {
            terrain_type: terrain_type.into(),
            seed: None,
            amplitude: None,
            frequency: None,
            octaves: None,
        }
    }

    pub fn seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    pub fn amplitude(mut self, amplitude: Option<f32>) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn frequency(mut self, frequency: Option<f32>) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn octaves(mut self, octaves: Option<u32>) -> Self {
        self.octaves = octaves;
        self
    }

    fn has_overrides(&self) -> bool {
        self.amplitude.is_some() || self.frequency.is_some() || self.octaves.is_some()
    }

    pub fn build(self) -> RoadNetResult<TerrainRecipe> {
        let seed = self.seed.unwrap_or_else(rand::random);

        // Presets first, then the raw noise families
        let (relief, base) = match TerrainRecipe::preset(&self.terrain_type, seed) {
            Some(recipe) => (recipe.relief, recipe.shape),
            None => match self.terrain_type.as_str() {
                "perlin" => (Relief::Rolling, CUSTOM_SHAPE),
                "ridged" => (Relief::Ridged, CUSTOM_SHAPE),
                other => {
                    return Err(RoadNetError::configuration(format!(
                        "Unknown terrain type: '{other}'. Available presets: {}. Custom algorithms: perlin, ridged",
                        preset_names().collect::<Vec<_>>().join(", ")
                    )));
                }
            },
        };

        if !self.has_overrides() {
            return Ok(TerrainRecipe::new(seed, relief, base));
        }
        if relief == Relief::Flat {
            warn!("Noise parameters are ignored for the 'flat' terrain type");
            return Ok(TerrainRecipe::new(seed, relief, base));
        }

        let shape = NoiseShape {
            amplitude: self.amplitude.unwrap_or(base.amplitude),
            frequency: self.frequency.unwrap_or(base.frequency),
            octaves: self.octaves.unwrap_or(base.octaves),
        };
        info!("Using '{}' with custom parameters: {shape:?}", self.terrain_type);
        Ok(TerrainRecipe::new(seed, relief, shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_builder_preset() {
        let recipe = TerrainBuilder::new("hills").seed(Some(12345)).build().unwrap();
        assert_eq!(recipe.seed, 12345);
        assert_eq!(recipe.relief, Relief::Rolling);
    }

    #[test]
    fn test_terrain_builder_partial_override() {
        let recipe = TerrainBuilder::new("mountains")
            .seed(Some(7))
            .amplitude(Some(50.0))
            .build()
            .unwrap();

        assert_eq!(recipe.relief, Relief::Ridged);
        assert_eq!(recipe.shape.amplitude, 50.0);
        assert_eq!(recipe.shape.frequency, 0.005);
        assert_eq!(recipe.shape.octaves, 5);
    }

    #[test]
    fn test_terrain_builder_custom_algorithm() {
        let recipe = TerrainBuilder::new("perlin")
            .seed(Some(12345))
            .amplitude(Some(25.0))
            .octaves(Some(8))
            .build()
            .unwrap();

        assert_eq!(recipe.relief, Relief::Rolling);
        assert_eq!(recipe.shape.amplitude, 25.0);
        assert_eq!(recipe.shape.frequency, CUSTOM_SHAPE.frequency);
        assert_eq!(recipe.shape.octaves, 8);
    }

    #[test]
    fn test_flat_ignores_overrides() {
        let recipe = TerrainBuilder::new("flat")
            .seed(Some(1))
            .amplitude(Some(30.0))
            .build()
            .unwrap();

        assert_eq!(recipe.relief, Relief::Flat);
        assert_eq!(recipe.shape.amplitude, 0.0);
    }

    #[test]
    fn test_terrain_builder_unknown_type() {
        assert!(matches!(
            TerrainBuilder::new("unknown").build(),
            Err(RoadNetError::Configuration { .. })
        ));
    }
}
