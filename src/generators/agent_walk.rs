//! Road growth by wandering agents.
//!
//! Every agent walks in fixed-length steps with a jittered heading, laying
//! an intersection and a road at each landing point. Agents die when they
//! leave the terrain, hit a slope that is too steep, or use up their step
//! budget. Survivors may spawn a perpendicular sibling; the branching chance
//! is shared by the live population, so crowded runs branch less.

use crate::errors::{RoadNetError, RoadNetResult, SafetyLimit};
use crate::network::{IntersectionId, RoadNetwork};
use crate::settings::AgentWalkConfig;
use crate::terrain::TerrainOracle;
use crate::terrain::coordinates::world_to_normalized;
use bevy::log::{debug, info, warn};
use bevy::math::{Vec2, Vec3};
use rand::Rng;
use std::time::Instant;

/// Why an agent-walk run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every agent terminated on its own
    Exhausted,
    /// A cooperative safety limit ended the run early
    Limit(SafetyLimit),
}

/// Outcome of one agent-walk run
#[derive(Debug, Clone)]
pub struct AgentWalkRun {
    pub network: RoadNetwork,
    pub stop_reason: StopReason,
    pub rounds: u32,
    pub peak_active_agents: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    OutOfBounds,
    TooSteep,
    StepBudget,
}

#[derive(Debug, Clone)]
struct Agent {
    position: Vec2,
    /// Degrees, 0 along +x, 90 along +z
    heading: f32,
    steps: u32,
    last: IntersectionId,
}

enum AgentStep {
    Terminate(Termination),
    Continue,
    ContinueAndSpawn(Agent),
}

pub struct AgentWalkGenerator {
    config: AgentWalkConfig,
}

impl AgentWalkGenerator {
    pub fn new(config: AgentWalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgentWalkConfig {
        &self.config
    }

    /// Simulate agents round by round until none remain or a limit trips
    pub fn run<O, R>(&self, oracle: &O, rng: &mut R) -> RoadNetResult<AgentWalkRun>
    where
        O: TerrainOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let bounds = oracle.bounds();
        let start = self
            .config
            .start
            .map(|[x, z]| Vec2::new(x, z))
            .unwrap_or_else(|| bounds.center());
        if !bounds.contains(start.x, start.y) {
            return Err(RoadNetError::configuration(format!(
                "agent start ({:.1}, {:.1}) lies outside the terrain",
                start.x, start.y
            )));
        }

        let mut network = RoadNetwork::new();
        let origin = network.add_intersection(Vec3::new(
            start.x,
            oracle.height(start.x, start.y),
            start.y,
        ));

        let mut agents: Vec<Agent> = (0..self.config.initial_agents)
            .map(|_| Agent {
                position: start,
                heading: rng.gen_range(0.0..360.0),
                steps: 0,
                last: origin,
            })
            .collect();

        info!(
            "Agent walk: {} agents starting at ({:.1}, {:.1})",
            agents.len(),
            start.x,
            start.y
        );

        let started = Instant::now();
        let mut rounds = 0;
        let mut peak_active_agents = agents.len();

        let stop_reason = loop {
            if agents.is_empty() {
                break StopReason::Exhausted;
            }
            if rounds >= self.config.max_rounds {
                break StopReason::Limit(SafetyLimit::RoundCount);
            }
            if started.elapsed().as_secs_f32() > self.config.max_duration_secs {
                break StopReason::Limit(SafetyLimit::WallClock);
            }
            if agents.len() > self.config.max_active_agents as usize {
                break StopReason::Limit(SafetyLimit::AgentCount);
            }

            rounds += 1;
            let mut live = agents.len();
            let mut survivors = Vec::with_capacity(agents.len());

            for mut agent in std::mem::take(&mut agents) {
                match self.step_agent(&mut agent, oracle, &mut network, live, rng) {
                    AgentStep::Terminate(cause) => {
                        live -= 1;
                        debug!(
                            "Agent terminated after {} steps: {:?}",
                            agent.steps, cause
                        );
                    }
                    AgentStep::Continue => survivors.push(agent),
                    AgentStep::ContinueAndSpawn(sibling) => {
                        live += 1;
                        survivors.push(agent);
                        survivors.push(sibling);
                    }
                }
            }

            peak_active_agents = peak_active_agents.max(survivors.len());
            agents = survivors;
        };

        if let StopReason::Limit(limit) = stop_reason {
            warn!("Agent walk stopped early: {}", RoadNetError::SafetyLimitReached { limit });
        }

        info!(
            "Agent walk finished after {} rounds: {} intersections, {} roads",
            rounds,
            network.intersection_count(),
            network.road_count()
        );

        Ok(AgentWalkRun {
            network,
            stop_reason,
            rounds,
            peak_active_agents,
        })
    }

    fn step_agent<O, R>(
        &self,
        agent: &mut Agent,
        oracle: &O,
        network: &mut RoadNetwork,
        live_agents: usize,
        rng: &mut R,
    ) -> AgentStep
    where
        O: TerrainOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let max_turn = self.config.max_turn_angle.get();
        if max_turn > 0.0 {
            agent.heading += rng.gen_range(-max_turn..=max_turn);
        }

        let direction = Vec2::from_angle(agent.heading.to_radians());
        let landing = agent.position + direction * self.config.step_size;

        if !oracle.bounds().contains(landing.x, landing.y) {
            debug!(
                "{}",
                RoadNetError::BoundsViolation {
                    x: landing.x,
                    z: landing.y
                }
            );
            return AgentStep::Terminate(Termination::OutOfBounds);
        }

        let normalized = world_to_normalized(oracle, landing.x, landing.y);
        if oracle.steepness(normalized.x, normalized.y) > self.config.max_steepness.get() {
            return AgentStep::Terminate(Termination::TooSteep);
        }

        let elevation = oracle.height(landing.x, landing.y);
        let intersection = network.add_intersection(Vec3::new(landing.x, elevation, landing.y));
        network.connect(agent.last, intersection);

        agent.position = landing;
        agent.last = intersection;
        agent.steps += 1;

        if agent.steps >= self.config.max_steps_per_agent {
            return AgentStep::Terminate(Termination::StepBudget);
        }

        let chance = self.config.branching_chance.get() / live_agents.max(1) as f32;
        if rng.gen_range(0.0..1.0_f32) < chance {
            let turn = if rng.gen_bool(0.5) { 90.0 } else { -90.0 };
            return AgentStep::ContinueAndSpawn(Agent {
                position: agent.position,
                heading: agent.heading + turn,
                steps: 0,
                last: agent.last,
            });
        }

        AgentStep::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::range_types::{Probability, SlopeLimit, TurnAngle};
    use crate::network::tests_support::assert_network_invariants;
    use crate::terrain::TerrainData;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn quiet_config() -> AgentWalkConfig {
        AgentWalkConfig {
            initial_agents: 1,
            branching_chance: Probability::new(0.0),
            max_turn_angle: TurnAngle::new(0.0),
            step_size: 1.0,
            ..AgentWalkConfig::default()
        }
    }

    #[test]
    fn test_walk_respects_graph_invariants() {
        let terrain = TerrainData::create_flat(64, 64, 1.0, 0.0).unwrap();
        let generator = AgentWalkGenerator::new(AgentWalkConfig::default());
        let run = generator.run(&terrain, &mut Pcg64::seed_from_u64(3)).unwrap();

        assert!(run.network.intersection_count() > 1);
        assert_network_invariants(&run.network);
        // Every step adds exactly one intersection and one road
        assert_eq!(run.network.road_count(), run.network.intersection_count() - 1);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let terrain = TerrainData::create_flat(48, 48, 1.0, 0.0).unwrap();
        let generator = AgentWalkGenerator::new(AgentWalkConfig::default());

        let first = generator.run(&terrain, &mut Pcg64::seed_from_u64(99)).unwrap();
        let second = generator.run(&terrain, &mut Pcg64::seed_from_u64(99)).unwrap();

        assert_eq!(first.network.intersections(), second.network.intersections());
        assert_eq!(first.network.roads(), second.network.roads());
        assert_eq!(first.rounds, second.rounds);
    }

    #[test]
    fn test_step_budget_ends_agent() {
        let terrain = TerrainData::create_flat(64, 64, 1.0, 0.0).unwrap();
        let config = AgentWalkConfig {
            max_steps_per_agent: 5,
            ..quiet_config()
        };
        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(1))
            .unwrap();

        assert_eq!(run.stop_reason, StopReason::Exhausted);
        assert_eq!(run.network.intersection_count(), 6);
        assert_eq!(run.network.road_count(), 5);
    }

    #[test]
    fn test_round_cap_is_soft_stop() {
        let terrain = TerrainData::create_flat(64, 64, 1.0, 0.0).unwrap();
        let config = AgentWalkConfig {
            max_rounds: 3,
            ..quiet_config()
        };
        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(1))
            .unwrap();

        assert_eq!(run.stop_reason, StopReason::Limit(SafetyLimit::RoundCount));
        assert_eq!(run.rounds, 3);
        assert_eq!(run.network.road_count(), 3);
        assert_network_invariants(&run.network);
    }

    #[test]
    fn test_zero_duration_is_wall_clock_stop() {
        // The lone agent could walk ~256 rounds before leaving the terrain
        let terrain = TerrainData::create_flat(512, 512, 1.0, 0.0).unwrap();
        let config = AgentWalkConfig {
            max_duration_secs: 0.0,
            max_rounds: 10_000,
            max_steps_per_agent: 10_000,
            ..quiet_config()
        };
        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(1))
            .unwrap();

        assert_eq!(run.stop_reason, StopReason::Limit(SafetyLimit::WallClock));
        assert!(run.rounds < 256);
        assert_network_invariants(&run.network);
    }

    #[test]
    fn test_steep_terrain_stops_every_agent() {
        let mut heights = Vec::new();
        for _z in 0..32 {
            for x in 0..32 {
                heights.push(x as f32 * 10.0);
            }
        }
        let terrain = TerrainData::new(32, 32, heights, 1.0).unwrap();
        let config = AgentWalkConfig {
            initial_agents: 8,
            max_steepness: SlopeLimit::new(30.0),
            ..AgentWalkConfig::default()
        };

        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(5))
            .unwrap();

        assert_eq!(run.stop_reason, StopReason::Exhausted);
        assert_eq!(run.rounds, 1);
        assert_eq!(run.network.intersection_count(), 1);
        assert_eq!(run.network.road_count(), 0);
    }

    #[test]
    fn test_leaving_bounds_terminates_agent() {
        let terrain = TerrainData::create_flat(10, 10, 1.0, 0.0).unwrap();
        let config = AgentWalkConfig {
            step_size: 50.0,
            ..quiet_config()
        };
        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(11))
            .unwrap();

        assert_eq!(run.network.intersection_count(), 1);
        assert_eq!(run.stop_reason, StopReason::Exhausted);
    }

    #[test]
    fn test_agent_cap_overshoot_is_bounded() {
        let terrain = TerrainData::create_flat(400, 400, 1.0, 0.0).unwrap();
        let cap = 5;
        let config = AgentWalkConfig {
            initial_agents: 1,
            step_size: 0.5,
            max_turn_angle: TurnAngle::new(0.0),
            max_steps_per_agent: 10_000,
            branching_chance: Probability::new(1.0),
            max_rounds: 10_000,
            max_duration_secs: 60.0,
            max_active_agents: cap,
            ..AgentWalkConfig::default()
        };

        let run = AgentWalkGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(21))
            .unwrap();

        assert_eq!(run.stop_reason, StopReason::Limit(SafetyLimit::AgentCount));
        assert!(run.peak_active_agents > cap as usize);
        // Each live agent spawns at most one sibling per round
        assert!(run.peak_active_agents <= 2 * cap as usize);
        assert_network_invariants(&run.network);
    }

    #[test]
    fn test_start_outside_terrain_is_configuration_error() {
        let terrain = TerrainData::create_flat(10, 10, 1.0, 0.0).unwrap();
        let config = AgentWalkConfig {
            start: Some([500.0, 0.0]),
            ..AgentWalkConfig::default()
        };
        let result = AgentWalkGenerator::new(config).run(&terrain, &mut Pcg64::seed_from_u64(0));
        assert!(matches!(result, Err(RoadNetError::Configuration { .. })));
    }
}
