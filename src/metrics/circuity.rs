use crate::network::{IntersectionId, RoadNetwork};
use crate::terrain::constants::{CIRCUITY_MIN_EUCLIDEAN, CIRCUITY_MIN_RATIO};
use ordered_float::OrderedFloat;
use pathfinding::prelude::dijkstra_all;
use rand::Rng;
use std::collections::HashMap;

/// Mean ratio of network distance to straight-line distance.
///
/// All unordered pairs are measured when there are at most `samples` of
/// them, otherwise `samples` random pairs are drawn. Self pairs, pairs
/// closer than [`CIRCUITY_MIN_EUCLIDEAN`] and pairs in different components
/// are skipped. Returns the mean and the number of ratios it averages.
pub fn circuity<R: Rng + ?Sized>(
    network: &RoadNetwork,
    samples: usize,
    rng: &mut R,
) -> (Option<f32>, usize) {
    let count = network.intersection_count();
    if count < 2 || samples == 0 {
        return (None, 0);
    }

    let pairs = sample_pairs(count, samples, rng);
    let mut distances: HashMap<IntersectionId, HashMap<IntersectionId, OrderedFloat<f32>>> =
        HashMap::new();
    let mut total = 0.0;
    let mut retained = 0;

    for (a, b) in pairs {
        if a == b {
            continue;
        }
        let (Some(pos_a), Some(pos_b)) = (network.position(a), network.position(b)) else {
            continue;
        };
        let euclidean = pos_a.distance(pos_b);
        if euclidean <= CIRCUITY_MIN_EUCLIDEAN {
            continue;
        }

        let reachable = distances
            .entry(a)
            .or_insert_with(|| shortest_distances(network, a));
        let Some(&OrderedFloat(network_distance)) = reachable.get(&b) else {
            continue;
        };

        let ratio = network_distance / euclidean;
        if ratio >= CIRCUITY_MIN_RATIO {
            total += ratio;
            retained += 1;
        }
    }

    if retained == 0 {
        (None, 0)
    } else {
        (Some(total / retained as f32), retained)
    }
}

fn sample_pairs<R: Rng + ?Sized>(
    count: usize,
    samples: usize,
    rng: &mut R,
) -> Vec<(IntersectionId, IntersectionId)> {
    let all_pairs = count * (count - 1) / 2;
    if all_pairs <= samples {
        return (0..count)
            .flat_map(|i| (i + 1..count).map(move |j| (i, j)))
            .map(|(i, j)| (IntersectionId(i as u32), IntersectionId(j as u32)))
            .collect();
    }

    (0..samples)
        .map(|_| {
            (
                IntersectionId(rng.gen_range(0..count as u32)),
                IntersectionId(rng.gen_range(0..count as u32)),
            )
        })
        .collect()
}

/// Length-weighted shortest distances from `source` to every reachable node
fn shortest_distances(
    network: &RoadNetwork,
    source: IntersectionId,
) -> HashMap<IntersectionId, OrderedFloat<f32>> {
    dijkstra_all(&source, |&node| {
        network
            .incident_roads(node)
            .filter_map(|road| {
                let other = road.other_end(node)?;
                Some((other, OrderedFloat(network.road_length(road))))
            })
            .collect::<Vec<_>>()
    })
    .into_iter()
    .map(|(node, (_parent, cost))| (node, cost))
    .collect()
}
