//! Fractal road layouts from an L-system.
//!
//! The axiom is rewritten with the production rules, then the resulting
//! string drives a turtle over the terrain:
//!
//! - `F` moves forward one segment and lays a road
//! - `+` / `-` turn left / right
//! - `[` / `]` save / restore the cursor
//!
//! Any other symbol is only a rewriting placeholder. Segments that end near
//! an existing intersection snap onto it, so the layout can close loops.

use crate::errors::{RoadNetError, RoadNetResult, SafetyLimit};
use crate::network::{IntersectionId, RoadNetwork};
use crate::settings::{LSystemConfig, ProductionRule};
use crate::terrain::TerrainOracle;
use bevy::log::{debug, info, warn};
use bevy::math::{Vec2, Vec3};
use rand::Rng;
use std::collections::HashMap;

/// Result of repeatedly applying the production rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub symbols: String,
    /// Rounds fully applied
    pub iterations: u32,
    /// Whether the length cap cut rewriting short
    pub capped: bool,
}

/// Apply `rules` to `axiom` for `iterations` rounds.
///
/// Symbols without a rule are copied unchanged. If a round would produce
/// more than `max_length` symbols, the previous string is kept and
/// rewriting stops.
pub fn rewrite(axiom: &str, rules: &[ProductionRule], iterations: u32, max_length: usize) -> Rewrite {
    let productions: HashMap<char, Vec<char>> = rules
        .iter()
        .map(|rule| (rule.symbol, rule.replacement.chars().collect()))
        .collect();

    let mut current: Vec<char> = axiom.chars().collect();
    let mut capped = false;
    if current.len() > max_length {
        current.truncate(max_length);
        capped = true;
    }

    let mut applied = 0;
    while applied < iterations && !capped {
        let mut next = Vec::with_capacity(current.len() * 2);
        for &symbol in &current {
            match productions.get(&symbol) {
                Some(replacement) => next.extend_from_slice(replacement),
                None => next.push(symbol),
            }
            if next.len() > max_length {
                capped = true;
                break;
            }
        }
        if capped {
            break;
        }
        current = next;
        applied += 1;
    }

    if capped {
        warn!(
            "L-system rewriting stopped after {applied} of {iterations} rounds: {}",
            RoadNetError::SafetyLimitReached {
                limit: SafetyLimit::StringLength
            }
        );
    }

    Rewrite {
        symbols: current.into_iter().collect(),
        iterations: applied,
        capped,
    }
}

/// Outcome of one L-system run
#[derive(Debug, Clone)]
pub struct LSystemRun {
    pub network: RoadNetwork,
    pub rewrite: Rewrite,
    /// `F` moves dropped because they left the terrain
    pub skipped_segments: usize,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    position: Vec2,
    /// Degrees, 0 along +x, 90 along +z
    heading: f32,
    intersection: IntersectionId,
}

pub struct LSystemGenerator {
    config: LSystemConfig,
}

impl LSystemGenerator {
    pub fn new(config: LSystemConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LSystemConfig {
        &self.config
    }

    pub fn run<O, R>(&self, oracle: &O, rng: &mut R) -> RoadNetResult<LSystemRun>
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
                "L-system start ({:.1}, {:.1}) lies outside the terrain",
                start.x, start.y
            )));
        }

        let rewrite = rewrite(
            &self.config.axiom,
            &self.config.rules,
            self.config.iterations,
            self.config.max_string_length,
        );
        info!(
            "L-system: {} symbols after {} rounds",
            rewrite.symbols.len(),
            rewrite.iterations
        );

        let mut network = RoadNetwork::new();
        let origin = network.add_intersection(Vec3::new(
            start.x,
            oracle.height(start.x, start.y),
            start.y,
        ));
        let mut cursor = Cursor {
            position: start,
            heading: self.config.initial_heading,
            intersection: origin,
        };
        let mut stack: Vec<(IntersectionId, f32)> = Vec::new();
        let mut skipped_segments = 0;

        for symbol in rewrite.symbols.chars() {
            match symbol {
                'F' => {
                    if !self.draw_segment(&mut cursor, oracle, &mut network, rng) {
                        skipped_segments += 1;
                    }
                }
                '+' => cursor.heading += self.turn(rng),
                '-' => cursor.heading -= self.turn(rng),
                '[' => stack.push((cursor.intersection, cursor.heading)),
                ']' => match stack.pop() {
                    Some((intersection, heading)) => {
                        cursor.intersection = intersection;
                        cursor.heading = heading;
                        if let Some(position) = network.position(intersection) {
                            cursor.position = Vec2::new(position.x, position.z);
                        }
                    }
                    None => warn!("Ignoring ']' with an empty branch stack"),
                },
                _ => {}
            }
        }

        info!(
            "L-system finished: {} intersections, {} roads, {} segments off the terrain",
            network.intersection_count(),
            network.road_count(),
            skipped_segments
        );

        Ok(LSystemRun {
            network,
            rewrite,
            skipped_segments,
        })
    }

    fn turn<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.config.turn_angle.get() + jitter(rng, self.config.angle_variance)
    }

    /// Move forward one segment; returns false when the move left the terrain
    fn draw_segment<O, R>(
        &self,
        cursor: &mut Cursor,
        oracle: &O,
        network: &mut RoadNetwork,
        rng: &mut R,
    ) -> bool
    where
        O: TerrainOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let length = self.config.segment_length + jitter(rng, self.config.length_variance);
        let destination =
            cursor.position + Vec2::from_angle(cursor.heading.to_radians()) * length;

        if !oracle.bounds().contains(destination.x, destination.y) {
            debug!(
                "{}",
                RoadNetError::BoundsViolation {
                    x: destination.x,
                    z: destination.y
                }
            );
            return false;
        }

        let position = Vec3::new(
            destination.x,
            oracle.height(destination.x, destination.y),
            destination.y,
        );
        let target = network
            .nearest_within(position, self.config.merge_tolerance)
            .unwrap_or_else(|| network.add_intersection(position));

        network.connect(cursor.intersection, target);

        cursor.intersection = target;
        if let Some(snapped) = network.position(target) {
            cursor.position = Vec2::new(snapped.x, snapped.z);
        }
        true
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, variance: f32) -> f32 {
    if variance > 0.0 {
        rng.gen_range(-variance..=variance)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::range_types::TurnAngle;
    use crate::network::tests_support::assert_network_invariants;
    use crate::terrain::TerrainData;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn exact_config(axiom: &str) -> LSystemConfig {
        LSystemConfig {
            axiom: axiom.to_string(),
            rules: Vec::new(),
            iterations: 0,
            segment_length: 5.0,
            length_variance: 0.0,
            turn_angle: TurnAngle::new(90.0),
            angle_variance: 0.0,
            merge_tolerance: 1.0,
            start: None,
            initial_heading: 0.0,
            ..LSystemConfig::default()
        }
    }

    fn run_exact(axiom: &str) -> LSystemRun {
        let terrain = TerrainData::create_flat(41, 41, 1.0, 0.0).unwrap();
        LSystemGenerator::new(exact_config(axiom))
            .run(&terrain, &mut Pcg64::seed_from_u64(0))
            .unwrap()
    }

    #[test]
    fn test_unmatched_symbols_pass_through() {
        let rules = vec![ProductionRule::new('F', "FF")];
        let result = rewrite("F+X", &rules, 1, 100);
        assert_eq!(result.symbols, "FF+X");
        assert_eq!(result.iterations, 1);
        assert!(!result.capped);
    }

    #[test]
    fn test_rewriting_keeps_last_string_under_cap() {
        let rules = vec![ProductionRule::new('F', "FF")];
        let result = rewrite("F", &rules, 10, 100);
        assert_eq!(result.symbols.len(), 64);
        assert_eq!(result.iterations, 6);
        assert!(result.capped);
    }

    #[test]
    fn test_long_axiom_is_truncated() {
        let result = rewrite("FFFFF", &[], 3, 3);
        assert_eq!(result.symbols, "FFF");
        assert_eq!(result.iterations, 0);
        assert!(result.capped);
    }

    #[test]
    fn test_branch_returns_to_saved_intersection() {
        let run = run_exact("F[+F]F");
        let network = &run.network;

        assert_eq!(network.intersection_count(), 4);
        assert_eq!(network.road_count(), 3);
        let branch_point = IntersectionId(1);
        assert_eq!(network.degree(branch_point), 3);

        let origin = network.position(IntersectionId(0)).unwrap();
        let tip = network.position(IntersectionId(3)).unwrap();
        assert!((tip.x - origin.x - 10.0).abs() < 1e-4);
        assert!((tip.z - origin.z).abs() < 1e-4);
        assert_network_invariants(network);
    }

    #[test]
    fn test_closing_square_merges_into_start() {
        let run = run_exact("F+F+F+F");
        assert_eq!(run.network.intersection_count(), 4);
        assert_eq!(run.network.road_count(), 4);
        assert!(run.network.are_connected(IntersectionId(3), IntersectionId(0)));
    }

    #[test]
    fn test_unmatched_close_bracket_is_ignored() {
        let run = run_exact("]F]");
        assert_eq!(run.network.intersection_count(), 2);
        assert_eq!(run.network.road_count(), 1);
    }

    #[test]
    fn test_segments_leaving_terrain_are_skipped() {
        let terrain = TerrainData::create_flat(10, 10, 1.0, 0.0).unwrap();
        let config = LSystemConfig {
            segment_length: 100.0,
            ..exact_config("FF")
        };
        let run = LSystemGenerator::new(config)
            .run(&terrain, &mut Pcg64::seed_from_u64(0))
            .unwrap();

        assert_eq!(run.skipped_segments, 2);
        assert_eq!(run.network.intersection_count(), 1);
        assert_eq!(run.network.road_count(), 0);
    }

    #[test]
    fn test_default_rules_build_valid_network_reproducibly() {
        let terrain = TerrainData::create_flat(120, 120, 1.0, 0.0).unwrap();
        let generator = LSystemGenerator::new(LSystemConfig::default());

        let first = generator.run(&terrain, &mut Pcg64::seed_from_u64(4)).unwrap();
        let second = generator.run(&terrain, &mut Pcg64::seed_from_u64(4)).unwrap();

        assert!(first.network.road_count() > 10);
        assert_network_invariants(&first.network);
        assert_eq!(first.network.intersections(), second.network.intersections());
        assert_eq!(first.network.roads(), second.network.roads());
    }
}
