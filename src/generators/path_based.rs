//! Roads laid along cheapest paths between points of interest.
//!
//! The first POI is the hub. Every other POI is routed from the hub over the
//! terrain cost map, and long paths are thinned to intersections spaced at
//! least `min_segment_length` apart. Intersections are keyed by grid cell,
//! so routes that share cells share intersections. An optional second pass
//! adds shortcuts between nearby intersections.

use crate::errors::{RoadNetError, RoadNetResult, SafetyLimit};
use crate::network::{IntersectionId, RoadNetwork};
use crate::pathfinding::{CostMap, GridNode, GridPath, build_cost_map, find_path};
use crate::settings::PathBasedConfig;
use crate::terrain::TerrainOracle;
use crate::terrain::constants::MAX_POI_PLACEMENT_ATTEMPTS;
use crate::terrain::coordinates::{grid_to_world, grid_to_world_3d, world_to_grid};
use bevy::log::{debug, info, warn};
use rand::Rng;
use std::collections::HashMap;

/// Outcome of one path-based run
#[derive(Debug, Clone)]
pub struct PathBasedRun {
    pub network: RoadNetwork,
    /// POIs actually used, hub first
    pub pois: Vec<GridNode>,
    pub unreachable_pois: usize,
    pub shortcuts_added: usize,
    /// Set when the shortcut pass spent its whole attempt budget
    pub shortcut_limit: Option<SafetyLimit>,
}

pub struct PathBasedGenerator {
    config: PathBasedConfig,
}

impl PathBasedGenerator {
    pub fn new(config: PathBasedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PathBasedConfig {
        &self.config
    }

    pub fn run<O, R>(&self, oracle: &O, rng: &mut R) -> RoadNetResult<PathBasedRun>
    where
        O: TerrainOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let cost_map = build_cost_map(oracle)?;

        let pois = if self.config.pois.is_empty() {
            self.scatter_pois(&cost_map, rng)
        } else {
            self.configured_pois(&cost_map)?
        };
        if pois.len() < 2 {
            return Err(RoadNetError::configuration(format!(
                "path-based generation needs at least two POIs, got {}",
                pois.len()
            )));
        }

        info!(
            "Path-based generation: hub ({}, {}) with {} POIs",
            pois[0].x,
            pois[0].z,
            pois.len() - 1
        );

        let mut merger = PathMerger::new(oracle, self.config.min_segment_length);
        let hub = pois[0];
        merger.place(hub);

        let mut unreachable_pois = 0;
        for &poi in &pois[1..] {
            let path = find_path(&cost_map, hub, poi);
            if path.is_empty() {
                warn!(
                    "Skipping POI: {}",
                    RoadNetError::UnreachablePath {
                        start: hub,
                        goal: poi
                    }
                );
                unreachable_pois += 1;
                continue;
            }
            merger.merge(&path);
        }

        let (shortcuts_added, shortcut_limit) = if self.config.enable_shortcuts {
            self.add_shortcuts(&mut merger, &cost_map, rng)
        } else {
            (0, None)
        };

        let network = merger.into_network();
        info!(
            "Path-based generation finished: {} intersections, {} roads",
            network.intersection_count(),
            network.road_count()
        );

        Ok(PathBasedRun {
            network,
            pois,
            unreachable_pois,
            shortcuts_added,
            shortcut_limit,
        })
    }

    fn configured_pois(&self, cost_map: &CostMap) -> RoadNetResult<Vec<GridNode>> {
        self.config
            .pois
            .iter()
            .map(|&[x, z]| {
                let node = GridNode::new(x, z);
                if cost_map.contains(node) {
                    Ok(node)
                } else {
                    Err(RoadNetError::configuration(format!(
                        "POI ({x}, {z}) lies outside the {}x{} terrain grid",
                        cost_map.width, cost_map.height
                    )))
                }
            })
            .collect()
    }

    /// Hub at the grid center, the rest on random cells gentle enough to build on
    pub fn scatter_pois<R: Rng + ?Sized>(&self, cost_map: &CostMap, rng: &mut R) -> Vec<GridNode> {
        let wanted = self.config.random_poi_count as usize;
        if wanted == 0 {
            return Vec::new();
        }

        let mut pois = vec![GridNode::new(cost_map.width / 2, cost_map.height / 2)];
        let max_steepness = self.config.poi_max_steepness.get();

        while pois.len() < wanted {
            let candidate = (0..MAX_POI_PLACEMENT_ATTEMPTS).find_map(|_| {
                let node = GridNode::new(
                    rng.gen_range(0..cost_map.width),
                    rng.gen_range(0..cost_map.height),
                );
                (cost_map.cost_at(node) <= max_steepness).then_some(node)
            });

            match candidate {
                Some(node) => pois.push(node),
                None => {
                    debug!(
                        "No cell under {max_steepness} degrees after {MAX_POI_PLACEMENT_ATTEMPTS} attempts"
                    );
                    break;
                }
            }
        }

        pois
    }

    fn add_shortcuts<O, R>(
        &self,
        merger: &mut PathMerger<'_, O>,
        cost_map: &CostMap,
        rng: &mut R,
    ) -> (usize, Option<SafetyLimit>)
    where
        O: TerrainOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let mut added = 0;

        if merger.network.intersection_count() < 2 {
            return (0, None);
        }

        for _ in 0..self.config.shortcut_attempts {
            let count = merger.network.intersection_count();

            let a = IntersectionId(rng.gen_range(0..count as u32));
            let b = IntersectionId(rng.gen_range(0..count as u32));
            if a == b || merger.network.are_connected(a, b) {
                continue;
            }

            let (Some(pos_a), Some(pos_b)) = (merger.network.position(a), merger.network.position(b))
            else {
                continue;
            };
            if pos_a.distance(pos_b) > self.config.shortcut_max_distance {
                continue;
            }

            let (Some(start), Some(goal)) = (
                world_to_grid(merger.oracle, pos_a.x, pos_a.z),
                world_to_grid(merger.oracle, pos_b.x, pos_b.z),
            ) else {
                continue;
            };

            let path = find_path(cost_map, start, goal);
            if path.is_empty() {
                warn!(
                    "Skipping shortcut: {}",
                    RoadNetError::UnreachablePath { start, goal }
                );
                continue;
            }
            if merger.merge(&path) > 0 {
                added += 1;
            }
        }

        let limit = SafetyLimit::ConnectionAttempts;
        info!(
            "Added {added} shortcuts, stopping: {}",
            RoadNetError::SafetyLimitReached { limit }
        );
        (added, Some(limit))
    }
}

/// Turns grid paths into intersections and roads, reusing intersections by cell
struct PathMerger<'a, O: TerrainOracle + ?Sized> {
    oracle: &'a O,
    network: RoadNetwork,
    placed: HashMap<GridNode, IntersectionId>,
    min_segment_length: f32,
}

impl<'a, O: TerrainOracle + ?Sized> PathMerger<'a, O> {
    fn new(oracle: &'a O, min_segment_length: f32) -> Self {
        Self {
            oracle,
            network: RoadNetwork::new(),
            placed: HashMap::new(),
            min_segment_length,
        }
    }

    fn place(&mut self, node: GridNode) -> IntersectionId {
        if let Some(&id) = self.placed.get(&node) {
            return id;
        }
        let id = self
            .network
            .add_intersection(grid_to_world_3d(self.oracle, node));
        self.placed.insert(node, id);
        id
    }

    /// Lay a path into the network, returning how many roads were added
    fn merge(&mut self, path: &GridPath) -> usize {
        let Some((&first, rest)) = path.nodes.split_first() else {
            return 0;
        };

        let mut added = 0;
        let mut current = self.place(first);
        let mut previous_world = grid_to_world(self.oracle, first);
        let mut accumulated = 0.0;

        for (index, &node) in rest.iter().enumerate() {
            let world = grid_to_world(self.oracle, node);
            accumulated += previous_world.distance(world);
            previous_world = world;

            let is_last = index + 1 == rest.len();
            if accumulated < self.min_segment_length && !is_last {
                continue;
            }

            let next = self.place(node);
            if next != current && !self.network.are_connected(current, next) {
                self.network.connect(current, next);
                added += 1;
            }
            current = next;
            accumulated = 0.0;
        }

        added
    }

    fn into_network(self) -> RoadNetwork {
        self.network
    }
}
