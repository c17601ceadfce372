use crate::config::range_types::*;
use crate::errors::{RoadNetError, RoadNetResult};
use crate::terrain::constants::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Rejects NaN and infinities, which `range` lets through
fn finite(value: f32) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

/// Every tunable of a generation run, one section per technique
#[derive(Serialize, Deserialize, Validate, Clone, Debug, Default)]
#[serde(default)]
// NOTE: When adding new fields, keep the field names stable; they are the config.toml keys
pub struct GenerationSettings {
    #[validate(nested)]
    pub agent_walk: AgentWalkConfig,
    #[validate(nested)]
    pub path_based: PathBasedConfig,
    #[validate(nested)]
    pub lsystem: LSystemConfig,
    #[validate(nested)]
    pub metrics: MetricsConfig,
}

impl GenerationSettings {
    /// Validate every section, flattening the report into one error
    pub fn checked(self) -> RoadNetResult<Self> {
        self.validate()
            .map_err(|errors| RoadNetError::from_validation(&errors))?;
        Ok(self)
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(default)]
pub struct AgentWalkConfig {
    #[validate(range(min = 1, max = 10_000))]
    pub initial_agents: u32,
    /// World (x, z) where agents start; terrain center when absent
    pub start: Option<[f32; 2]>,
    #[validate(range(min = 0.01, max = 10000.0), custom(function = "finite"))]
    pub step_size: f32,
    pub max_turn_angle: TurnAngle,
    pub max_steepness: SlopeLimit,
    #[validate(range(min = 1))]
    pub max_steps_per_agent: u32,
    /// Spread over the live population: each agent branches with chance / live
    pub branching_chance: Probability,
    #[validate(range(min = 1))]
    pub max_rounds: u32,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub max_duration_secs: f32,
    #[validate(range(min = 1))]
    pub max_active_agents: u32,
}

impl Default for AgentWalkConfig {
    fn default() -> Self {
        Self {
            initial_agents: DEFAULT_INITIAL_AGENTS,
            start: None,
            step_size: DEFAULT_AGENT_STEP_SIZE,
            max_turn_angle: TurnAngle::new(DEFAULT_MAX_TURN_ANGLE),
            max_steepness: SlopeLimit::new(DEFAULT_MAX_STEEPNESS),
            max_steps_per_agent: DEFAULT_MAX_STEPS_PER_AGENT,
            branching_chance: Probability::new(DEFAULT_BRANCHING_CHANCE),
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            max_active_agents: DEFAULT_MAX_ACTIVE_AGENTS,
        }
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(default)]
pub struct PathBasedConfig {
    /// Grid cells to connect, hub first; scattered at random when empty
    pub pois: Vec<[u32; 2]>,
    pub random_poi_count: u32,
    pub poi_max_steepness: SlopeLimit,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub min_segment_length: f32,
    pub enable_shortcuts: bool,
    pub shortcut_attempts: u32,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub shortcut_max_distance: f32,
}

impl Default for PathBasedConfig {
    fn default() -> Self {
        Self {
            pois: Vec::new(),
            random_poi_count: DEFAULT_RANDOM_POI_COUNT,
            poi_max_steepness: SlopeLimit::new(DEFAULT_POI_MAX_STEEPNESS),
            min_segment_length: DEFAULT_MIN_SEGMENT_LENGTH,
            enable_shortcuts: true,
            shortcut_attempts: DEFAULT_SHORTCUT_ATTEMPTS,
            shortcut_max_distance: DEFAULT_SHORTCUT_MAX_DISTANCE,
        }
    }
}

/// One L-system production: `symbol` is replaced by `replacement`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductionRule {
    pub symbol: char,
    pub replacement: String,
}

impl ProductionRule {
    pub fn new(symbol: char, replacement: &str) -> Self {
        Self {
            symbol,
            replacement: replacement.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(default)]
pub struct LSystemConfig {
    #[validate(length(min = 1))]
    pub axiom: String,
    pub rules: Vec<ProductionRule>,
    #[validate(range(max = 16))]
    pub iterations: u32,
    #[validate(range(min = 1))]
    pub max_string_length: usize,
    #[validate(range(min = 0.01, max = 10000.0), custom(function = "finite"))]
    pub segment_length: f32,
    #[validate(range(min = 0.0, max = 10000.0), custom(function = "finite"))]
    pub length_variance: f32,
    pub turn_angle: TurnAngle,
    #[validate(range(min = 0.0, max = 180.0), custom(function = "finite"))]
    pub angle_variance: f32,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub merge_tolerance: f32,
    /// World (x, z) of the first intersection; terrain center when absent
    pub start: Option<[f32; 2]>,
    /// Initial heading in degrees, 0 along +x, 90 along +z
    #[validate(custom(function = "finite"))]
    pub initial_heading: f32,
}

impl Default for LSystemConfig {
    fn default() -> Self {
        Self {
            axiom: "F".to_string(),
            rules: vec![ProductionRule::new('F', "F[+F]F[-F]F")],
            iterations: DEFAULT_LSYSTEM_ITERATIONS,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            length_variance: DEFAULT_LENGTH_VARIANCE,
            turn_angle: TurnAngle::new(DEFAULT_TURN_ANGLE),
            angle_variance: DEFAULT_ANGLE_VARIANCE,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            start: None,
            initial_heading: 90.0,
        }
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug)]
#[serde(default)]
pub struct MetricsConfig {
    #[validate(range(min = 1))]
    pub circuity_samples: usize,
    #[validate(range(min = 1.0, max = 180.0), custom(function = "finite"))]
    pub angle_bin_width: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            circuity_samples: CIRCUITY_SAMPLE_PAIRS,
            angle_bin_width: DEFAULT_ANGLE_BIN_WIDTH,
        }
    }
}
