//! Deterministic A* over a [`CostMap`].
//!
//! Nodes live in an arena indexed by grid cell for the duration of one
//! search. Parents are arena indices, so reconstruction is a walk over
//! plain integers and the whole arena is dropped when the call returns.
//!
//! The frontier is a plain vector scanned linearly: the lowest f wins, ties
//! go to the lowest h, and remaining ties to the entry inserted first. This
//! is slower than a heap but gives identical paths for identical inputs.

use super::{CostMap, GridNode, NEIGHBOR_OFFSETS, step_cost};
use bevy::log::debug;

/// Result of a search; empty when no route exists
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridPath {
    pub nodes: Vec<GridNode>,
    pub cost: f32,
}

impl GridPath {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct PathNode {
    g: f32,
    h: f32,
    parent: Option<usize>,
    state: NodeState,
}

impl PathNode {
    const UNVISITED: PathNode = PathNode {
        g: f32::INFINITY,
        h: 0.0,
        parent: None,
        state: NodeState::Unvisited,
    };

    fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Find the cheapest 8-connected path from `start` to `goal`.
///
/// Moving costs 10 straight or 14 diagonally, plus the cost of the cell
/// being entered. Cells with a non-finite cost are impassable. Returns an
/// empty path when an endpoint is off the map or the goal is unreachable.
pub fn find_path(cost_map: &CostMap, start: GridNode, goal: GridNode) -> GridPath {
    if !cost_map.contains(start) || !cost_map.contains(goal) {
        debug!(
            "Pathfinding skipped: endpoint outside {}x{} map",
            cost_map.width, cost_map.height
        );
        return GridPath::default();
    }

    let width = cost_map.width;
    let index_of = |node: GridNode| (node.z * width + node.x) as usize;
    let node_at = |index: usize| GridNode::new(index as u32 % width, index as u32 / width);

    let mut arena = vec![PathNode::UNVISITED; cost_map.cell_count()];
    let mut open: Vec<usize> = Vec::new();

    let start_index = index_of(start);
    arena[start_index] = PathNode {
        g: 0.0,
        h: start.octile_distance(&goal),
        parent: None,
        state: NodeState::Open,
    };
    open.push(start_index);

    let goal_index = index_of(goal);

    while !open.is_empty() {
        let position = select_lowest(&open, &arena);
        let current_index = open.remove(position);
        arena[current_index].state = NodeState::Closed;

        if current_index == goal_index {
            let nodes = reconstruct(&arena, goal_index, node_at);
            let cost = arena[goal_index].g;
            debug!(
                "Pathfinding success: {} nodes, cost {:.1}",
                nodes.len(),
                cost
            );
            return GridPath { nodes, cost };
        }

        let current = node_at(current_index);
        let current_g = arena[current_index].g;

        for (dx, dz) in NEIGHBOR_OFFSETS {
            let Some(neighbor) = current.offset(dx, dz, cost_map.width, cost_map.height) else {
                continue;
            };

            let terrain_cost = cost_map.cost_at(neighbor);
            if !terrain_cost.is_finite() {
                continue;
            }

            let neighbor_index = index_of(neighbor);
            let entry = &mut arena[neighbor_index];
            if entry.state == NodeState::Closed {
                continue;
            }

            let tentative_g = current_g + step_cost(dx, dz) + terrain_cost;
            if tentative_g < entry.g {
                entry.g = tentative_g;
                entry.parent = Some(current_index);
                if entry.state == NodeState::Unvisited {
                    entry.h = neighbor.octile_distance(&goal);
                    entry.state = NodeState::Open;
                    open.push(neighbor_index);
                }
            }
        }
    }

    debug!(
        "Pathfinding failed: ({}, {}) -> ({}, {}) unreachable",
        start.x, start.z, goal.x, goal.z
    );
    GridPath::default()
}

/// Position in `open` of the entry with lowest f, then lowest h
fn select_lowest(open: &[usize], arena: &[PathNode]) -> usize {
    let mut best = 0;
    for (position, &index) in open.iter().enumerate().skip(1) {
        let candidate = &arena[index];
        let incumbent = &arena[open[best]];
        let (cf, bf) = (candidate.f(), incumbent.f());
        if cf < bf || (cf == bf && candidate.h < incumbent.h) {
            best = position;
        }
    }
    best
}

fn reconstruct(
    arena: &[PathNode],
    goal_index: usize,
    node_at: impl Fn(usize) -> GridNode,
) -> Vec<GridNode> {
    let mut nodes = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        nodes.push(node_at(index));
        cursor = arena[index].parent;
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinding::prelude::dijkstra;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    /// Recompute the cost of an existing path under the A* cost model
    fn path_cost(cost_map: &CostMap, nodes: &[GridNode]) -> f32 {
        nodes
            .windows(2)
            .map(|pair| {
                let dx = pair[1].x as i32 - pair[0].x as i32;
                let dz = pair[1].z as i32 - pair[0].z as i32;
                step_cost(dx, dz) + cost_map.cost_at(pair[1])
            })
            .sum()
    }

    /// Exhaustive reference: Dijkstra on integer costs
    fn brute_force_cost(cost_map: &CostMap, start: GridNode, goal: GridNode) -> Option<u32> {
        dijkstra(
            &start,
            |node| {
                let node = *node;
                NEIGHBOR_OFFSETS
                    .iter()
                    .filter_map(move |&(dx, dz)| {
                        let next = node.offset(dx, dz, cost_map.width, cost_map.height)?;
                        let terrain = cost_map.cost_at(next);
                        terrain
                            .is_finite()
                            .then(|| (next, (step_cost(dx, dz) + terrain) as u32))
                    })
                    .collect::<Vec<_>>()
            },
            |node| *node == goal,
        )
        .map(|(_, cost)| cost)
    }

    #[test]
    fn test_flat_grid_diagonal_cost() {
        let map = CostMap::uniform(10, 10, 0.0);
        let path = find_path(&map, GridNode::new(0, 0), GridNode::new(9, 9));

        assert_eq!(path.cost, 126.0);
        assert_eq!(path.len(), 10);
        assert_eq!(path.nodes.first(), Some(&GridNode::new(0, 0)));
        assert_eq!(path.nodes.last(), Some(&GridNode::new(9, 9)));
        assert_eq!(path_cost(&map, &path.nodes), 126.0);
    }

    #[test]
    fn test_uniform_grid_matches_octile_distance() {
        let map = CostMap::uniform(12, 9, 0.0);
        let start = GridNode::new(2, 7);
        for goal in [GridNode::new(11, 0), GridNode::new(2, 0), GridNode::new(5, 8)] {
            let path = find_path(&map, start, goal);
            assert_eq!(path.cost, start.octile_distance(&goal));
        }
    }

    #[test]
    fn test_equal_f_prefers_lower_h() {
        // (1,0) and (1,1) both reach f = 24; (1,1) is closer to the goal
        // and must be expanded first even though (1,0) was queued earlier
        let map = CostMap::uniform(3, 2, 0.0);
        let path = find_path(&map, GridNode::new(0, 0), GridNode::new(2, 1));

        assert_eq!(
            path.nodes,
            vec![GridNode::new(0, 0), GridNode::new(1, 1), GridNode::new(2, 1)]
        );
        assert_eq!(path.cost, 24.0);
    }

    #[test]
    fn test_start_equals_goal() {
        let map = CostMap::uniform(5, 5, 1.0);
        let node = GridNode::new(2, 2);
        let path = find_path(&map, node, node);
        assert_eq!(path.nodes, vec![node]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_invalid_endpoints_return_empty() {
        let map = CostMap::uniform(5, 5, 0.0);
        assert!(find_path(&map, GridNode::new(0, 0), GridNode::new(5, 0)).is_empty());
        assert!(find_path(&map, GridNode::new(9, 9), GridNode::new(1, 1)).is_empty());
    }

    #[test]
    fn test_unreachable_goal_returns_empty() {
        // A full wall of impassable cells splits the map
        let mut map = CostMap::uniform(7, 7, 0.0);
        for z in 0..7 {
            map.set_cost(GridNode::new(3, z), f32::INFINITY);
        }
        let path = find_path(&map, GridNode::new(0, 3), GridNode::new(6, 3));
        assert!(path.is_empty());
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_path_avoids_expensive_cells() {
        let mut map = CostMap::uniform(9, 5, 0.0);
        // A costly band with a cheap gap at the bottom row
        for z in 0..4 {
            map.set_cost(GridNode::new(4, z), 500.0);
        }
        let path = find_path(&map, GridNode::new(0, 0), GridNode::new(8, 0));
        assert!(path.nodes.contains(&GridNode::new(4, 4)));
        assert!(path.cost < 500.0);
    }

    #[test]
    fn test_pathfinding_is_deterministic() {
        let mut rng = Pcg64::seed_from_u64(42);
        let costs: Vec<f32> = (0..30 * 30).map(|_| rng.gen_range(0.0..5.0_f32).floor()).collect();
        let map = CostMap::from_costs(30, 30, costs).unwrap();

        let first = find_path(&map, GridNode::new(1, 2), GridNode::new(27, 25));
        let second = find_path(&map, GridNode::new(1, 2), GridNode::new(27, 25));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_matches_brute_force_on_small_grids() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..25 {
            let width = rng.gen_range(2..8);
            let height = rng.gen_range(2..8);
            // Integral costs keep the f32 sums exact
            let costs: Vec<f32> = (0..width * height)
                .map(|_| rng.gen_range(0..6) as f32)
                .collect();
            let map = CostMap::from_costs(width, height, costs).unwrap();

            let start = GridNode::new(rng.gen_range(0..width), rng.gen_range(0..height));
            let goal = GridNode::new(rng.gen_range(0..width), rng.gen_range(0..height));

            let path = find_path(&map, start, goal);
            let expected = brute_force_cost(&map, start, goal).expect("open grid is connected");
            assert_eq!(path.cost as u32, expected, "{start:?} -> {goal:?}");
            assert_eq!(path_cost(&map, &path.nodes), path.cost);
        }
    }

    #[test]
    fn test_uniform_grid_brute_force_equals_octile() {
        let map = CostMap::uniform(6, 6, 0.0);
        for gx in 0..6 {
            for gz in 0..6 {
                let goal = GridNode::new(gx, gz);
                let expected = GridNode::new(0, 0).octile_distance(&goal) as u32;
                assert_eq!(brute_force_cost(&map, GridNode::new(0, 0), goal), Some(expected));
                assert_eq!(find_path(&map, GridNode::new(0, 0), goal).cost as u32, expected);
            }
        }
    }
}
