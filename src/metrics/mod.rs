//! Scores for a finished road network.
//!
//! Topology (degree spread, components, alpha and gamma indices), route
//! directness (circuity), layout (angles between meeting roads) and terrain
//! fit (road gradient). Values that do not apply to a graph are `None` and
//! are left out when the record is serialized.

use crate::network::RoadNetwork;
use crate::settings::MetricsConfig;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

pub mod circuity;
pub mod connectivity;
pub mod geometry;

pub use circuity::circuity;
pub use connectivity::{alpha_index, connected_components, degree_distribution, gamma_index};
pub use geometry::{angle_histogram, average_steepness};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub intersection_count: usize,
    pub road_count: usize,
    pub total_road_length: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_road_length: Option<f32>,
    /// Index is the degree
    pub degree_distribution: Vec<usize>,
    pub connected_components: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuity: Option<f32>,
    pub circuity_pairs: usize,
    pub angle_bin_width: f32,
    pub angle_histogram: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_steepness_deg: Option<f32>,
    pub generation_time_s: f64,
    pub approx_memory_bytes: usize,
}

pub fn compute_metrics<R: Rng + ?Sized>(
    network: &RoadNetwork,
    elapsed: Duration,
    config: &MetricsConfig,
    rng: &mut R,
) -> MetricsRecord {
    let vertices = network.intersection_count();
    let edges = network.road_count();
    let components = connected_components(network);
    let total_road_length = network.total_length();
    let (circuity, circuity_pairs) = circuity(network, config.circuity_samples, rng);

    MetricsRecord {
        intersection_count: vertices,
        road_count: edges,
        total_road_length,
        mean_road_length: (edges > 0).then(|| total_road_length / edges as f32),
        degree_distribution: degree_distribution(network),
        connected_components: components,
        alpha: alpha_index(vertices, edges, components),
        gamma: gamma_index(vertices, edges, components),
        circuity,
        circuity_pairs,
        angle_bin_width: config.angle_bin_width,
        angle_histogram: angle_histogram(network, config.angle_bin_width),
        average_steepness_deg: average_steepness(network),
        generation_time_s: elapsed.as_secs_f64(),
        approx_memory_bytes: network.approx_memory_bytes(),
    }
}
