//! Interchangeable road-network generators.
//!
//! [`Technique`] wraps the configuration of one strategy and runs it against
//! an optional terrain oracle. An absent or malformed oracle is rejected
//! before any work starts.

use crate::errors::RoadNetResult;
use crate::metrics::{MetricsRecord, compute_metrics};
use crate::network::RoadNetwork;
use crate::settings::{AgentWalkConfig, GenerationSettings, LSystemConfig, MetricsConfig, PathBasedConfig};
use crate::terrain::{TerrainOracle, require_oracle};
use bevy::log::info;
use derive_more::Display;
use rand::Rng;
use serde::Serialize;
use std::time::Instant;

pub mod agent_walk;
pub mod lsystem;
pub mod path_based;

pub use agent_walk::{AgentWalkGenerator, AgentWalkRun, StopReason};
pub use lsystem::{LSystemGenerator, LSystemRun, Rewrite, rewrite};
pub use path_based::{PathBasedGenerator, PathBasedRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum TechniqueKind {
    #[display("AgentBasedRandomWalk")]
    AgentBasedRandomWalk,
    #[display("PathBasedAStarPOIs")]
    PathBasedAStarPOIs,
    #[display("LSystem")]
    LSystem,
}

impl TechniqueKind {
    pub const ALL: [TechniqueKind; 3] = [
        TechniqueKind::AgentBasedRandomWalk,
        TechniqueKind::PathBasedAStarPOIs,
        TechniqueKind::LSystem,
    ];
}

/// A generation strategy together with its parameters
#[derive(Debug, Clone)]
pub enum Technique {
    AgentWalk(AgentWalkConfig),
    PathBased(PathBasedConfig),
    LSystem(LSystemConfig),
}

impl Technique {
    /// Pick the strategy of `kind` with its section of `settings`
    pub fn from_settings(kind: TechniqueKind, settings: &GenerationSettings) -> Self {
        match kind {
            TechniqueKind::AgentBasedRandomWalk => Self::AgentWalk(settings.agent_walk.clone()),
            TechniqueKind::PathBasedAStarPOIs => Self::PathBased(settings.path_based.clone()),
            TechniqueKind::LSystem => Self::LSystem(settings.lsystem.clone()),
        }
    }

    pub fn kind(&self) -> TechniqueKind {
        match self {
            Self::AgentWalk(_) => TechniqueKind::AgentBasedRandomWalk,
            Self::PathBased(_) => TechniqueKind::PathBasedAStarPOIs,
            Self::LSystem(_) => TechniqueKind::LSystem,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        oracle: Option<&dyn TerrainOracle>,
        rng: &mut R,
    ) -> RoadNetResult<RoadNetwork> {
        let oracle = require_oracle(oracle)?;

        let network = match self {
            Self::AgentWalk(config) => {
                AgentWalkGenerator::new(config.clone())
                    .run(oracle, rng)?
                    .network
            }
            Self::PathBased(config) => {
                PathBasedGenerator::new(config.clone())
                    .run(oracle, rng)?
                    .network
            }
            Self::LSystem(config) => LSystemGenerator::new(config.clone()).run(oracle, rng)?.network,
        };

        Ok(network)
    }
}

/// One timed run and its scores
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub technique: TechniqueKind,
    pub network: RoadNetwork,
    pub metrics: MetricsRecord,
}

/// Run `technique`, time it, and score the resulting network
pub fn generate_and_measure<R: Rng + ?Sized>(
    technique: &Technique,
    oracle: Option<&dyn TerrainOracle>,
    metrics_config: &MetricsConfig,
    rng: &mut R,
) -> RoadNetResult<GenerationReport> {
    let started = Instant::now();
    let network = technique.generate(oracle, rng)?;
    let elapsed = started.elapsed();

    info!(
        "{} generated {} intersections in {:.3}s",
        technique.kind(),
        network.intersection_count(),
        elapsed.as_secs_f64()
    );

    let metrics = compute_metrics(&network, elapsed, metrics_config, rng);
    Ok(GenerationReport {
        technique: technique.kind(),
        network,
        metrics,
    })
}
