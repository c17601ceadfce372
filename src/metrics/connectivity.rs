use crate::network::{IntersectionId, RoadNetwork};
use std::collections::VecDeque;

/// Number of connected components, by breadth-first search
pub fn connected_components(network: &RoadNetwork) -> usize {
    let mut visited = vec![false; network.intersection_count()];
    let mut components = 0;
    let mut queue = VecDeque::new();

    for seed in 0..visited.len() {
        if visited[seed] {
            continue;
        }
        components += 1;
        visited[seed] = true;
        queue.push_back(IntersectionId(seed as u32));

        while let Some(current) = queue.pop_front() {
            for neighbor in network.neighbors(current) {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    components
}

/// Count of intersections per degree; index is the degree
pub fn degree_distribution(network: &RoadNetwork) -> Vec<usize> {
    let mut histogram = Vec::new();
    for intersection in network.intersections() {
        let degree = network.degree(intersection.id);
        if histogram.len() <= degree {
            histogram.resize(degree + 1, 0);
        }
        histogram[degree] += 1;
    }
    histogram
}

/// Meshedness: observed independent cycles over the planar maximum
pub fn alpha_index(vertices: usize, edges: usize, components: usize) -> Option<f32> {
    let numerator = edges as f32 - vertices as f32 + components as f32;
    let denominator = 2.0 * vertices as f32 - 5.0 * components as f32;
    ratio_or_zero(numerator, denominator)
}

/// Edge density: observed edges over the planar maximum
pub fn gamma_index(vertices: usize, edges: usize, components: usize) -> Option<f32> {
    let denominator = 3.0 * vertices as f32 - 6.0 * components as f32;
    ratio_or_zero(edges as f32, denominator)
}

/// Degenerate denominators give 0 for an empty numerator, otherwise nothing
fn ratio_or_zero(numerator: f32, denominator: f32) -> Option<f32> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else if numerator == 0.0 {
        Some(0.0)
    } else {
        None
    }
}
