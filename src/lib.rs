pub mod config;
pub mod errors;
pub mod generators;
pub mod metrics;
pub mod network;
pub mod pathfinding;
pub mod settings;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

pub use errors::{RoadNetError, RoadNetResult, SafetyLimit};

pub use generators::{GenerationReport, Technique, TechniqueKind, generate_and_measure};

pub use metrics::{MetricsRecord, compute_metrics};

pub use network::{Intersection, IntersectionId, Road, RoadId, RoadNetwork};

pub use settings::GenerationSettings;

pub use terrain::{TerrainBounds, TerrainData, TerrainOracle};
