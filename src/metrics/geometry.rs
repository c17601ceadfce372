use crate::network::RoadNetwork;
use crate::terrain::constants::MIN_HORIZONTAL_ROAD_LENGTH;
use bevy::math::Vec2;

/// Histogram of angles between roads meeting at an intersection.
///
/// Every pair of roads at an intersection of degree two or more contributes
/// its unsigned horizontal angle in [0, 180] degrees. Bins are
/// `bin_width` wide; 180 degrees lands in the last bin.
pub fn angle_histogram(network: &RoadNetwork, bin_width: f32) -> Vec<usize> {
    let bin_width = bin_width.max(f32::EPSILON);
    let bins = (180.0 / bin_width).ceil().max(1.0) as usize;
    let mut histogram = vec![0; bins];

    for intersection in network.intersections() {
        if network.degree(intersection.id) < 2 {
            continue;
        }
        let origin = Vec2::new(intersection.position.x, intersection.position.z);
        let directions: Vec<Vec2> = network
            .neighbors(intersection.id)
            .filter_map(|neighbor| network.position(neighbor))
            .map(|position| (Vec2::new(position.x, position.z) - origin).normalize_or_zero())
            .filter(|direction| *direction != Vec2::ZERO)
            .collect();

        for (i, first) in directions.iter().enumerate() {
            for second in &directions[i + 1..] {
                let angle = first.dot(*second).clamp(-1.0, 1.0).acos().to_degrees();
                let bin = ((angle / bin_width) as usize).min(bins - 1);
                histogram[bin] += 1;
            }
        }
    }

    histogram
}

/// Mean road gradient in degrees, ignoring roads with no horizontal extent
pub fn average_steepness(network: &RoadNetwork) -> Option<f32> {
    let mut total = 0.0;
    let mut counted = 0;

    for road in network.roads() {
        let (Some(start), Some(end)) = (network.position(road.start), network.position(road.end))
        else {
            continue;
        };
        let horizontal = Vec2::new(start.x, start.z).distance(Vec2::new(end.x, end.z));
        if horizontal < MIN_HORIZONTAL_ROAD_LENGTH {
            continue;
        }
        total += (end.y - start.y).abs().atan2(horizontal).to_degrees();
        counted += 1;
    }

    (counted > 0).then(|| total / counted as f32)
}
