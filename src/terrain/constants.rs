/// Constants shared by the terrain, pathfinding and generation code

/// Pathfinding step costs (diagonal is 10 * sqrt(2), rounded)
pub const ASTAR_CARDINAL_COST: f32 = 10.0;
pub const ASTAR_DIAGONAL_COST: f32 = 14.0;

/// Terrain sampling fallback values
pub const FALLBACK_TERRAIN_HEIGHT: f32 = 0.0;

/// Default values for agent-walk generation
pub const DEFAULT_INITIAL_AGENTS: u32 = 2;
pub const DEFAULT_AGENT_STEP_SIZE: f32 = 4.0;
pub const DEFAULT_MAX_TURN_ANGLE: f32 = 20.0;
pub const DEFAULT_MAX_STEEPNESS: f32 = 30.0;
pub const DEFAULT_MAX_STEPS_PER_AGENT: u32 = 60;
pub const DEFAULT_BRANCHING_CHANCE: f32 = 0.15;
pub const DEFAULT_MAX_ROUNDS: u32 = 500;
pub const DEFAULT_MAX_ACTIVE_AGENTS: u32 = 200;
pub const DEFAULT_MAX_DURATION_SECS: f32 = 10.0;

/// Default values for path-based generation
pub const DEFAULT_RANDOM_POI_COUNT: u32 = 8;
pub const DEFAULT_POI_MAX_STEEPNESS: f32 = 25.0;
pub const DEFAULT_MIN_SEGMENT_LENGTH: f32 = 6.0;
pub const DEFAULT_SHORTCUT_ATTEMPTS: u32 = 20;
pub const DEFAULT_SHORTCUT_MAX_DISTANCE: f32 = 40.0;
pub const MAX_POI_PLACEMENT_ATTEMPTS: u32 = 50;

/// Default values for L-system generation
pub const DEFAULT_LSYSTEM_ITERATIONS: u32 = 4;
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100_000;
pub const DEFAULT_SEGMENT_LENGTH: f32 = 5.0;
pub const DEFAULT_LENGTH_VARIANCE: f32 = 1.0;
pub const DEFAULT_TURN_ANGLE: f32 = 90.0;
pub const DEFAULT_ANGLE_VARIANCE: f32 = 5.0;
pub const DEFAULT_MERGE_TOLERANCE: f32 = 1.0;

/// Metrics sampling
pub const CIRCUITY_SAMPLE_PAIRS: usize = 100;
pub const CIRCUITY_MIN_EUCLIDEAN: f32 = 0.01;
pub const CIRCUITY_MIN_RATIO: f32 = 0.99;
pub const MIN_HORIZONTAL_ROAD_LENGTH: f32 = 1e-4;
pub const DEFAULT_ANGLE_BIN_WIDTH: f32 = 15.0;
