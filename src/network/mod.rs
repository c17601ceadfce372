//! Road-network graph shared by every generator.
//!
//! Intersections live in an arena owned by the network; an
//! [`IntersectionId`] is both the public id and the arena index, handed out
//! in increasing order by the network's own counter. Roads refer to
//! intersections by id only.

use bevy::math::Vec3;
use derive_more::{Display, From};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct IntersectionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct RoadId(pub u32);

impl IntersectionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A road junction at (x, elevation, z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub id: IntersectionId,
    pub position: Vec3,
}

/// Undirected connection between two distinct intersections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Road {
    pub id: RoadId,
    pub start: IntersectionId,
    pub end: IntersectionId,
}

impl Road {
    /// The endpoint that is not `from`, if `from` is an endpoint at all
    pub fn other_end(&self, from: IntersectionId) -> Option<IntersectionId> {
        if self.start == from {
            Some(self.end)
        } else if self.end == from {
            Some(self.start)
        } else {
            None
        }
    }
}

fn edge_key(a: IntersectionId, b: IntersectionId) -> (IntersectionId, IntersectionId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Graph produced by one generation run
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    intersections: Vec<Intersection>,
    roads: Vec<Road>,
    /// Incident road indices per intersection
    incident: Vec<Vec<usize>>,
    edges: HashSet<(IntersectionId, IntersectionId)>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an intersection with the next id of this run
    pub fn add_intersection(&mut self, position: Vec3) -> IntersectionId {
        let id = IntersectionId(self.intersections.len() as u32);
        self.intersections.push(Intersection { id, position });
        self.incident.push(Vec::new());
        id
    }

    /// Connect two intersections with a road.
    ///
    /// Returns `None` for unknown ids, self-loops and pairs that already
    /// share a road.
    pub fn connect(&mut self, a: IntersectionId, b: IntersectionId) -> Option<RoadId> {
        if a == b || !self.contains(a) || !self.contains(b) {
            return None;
        }
        if !self.edges.insert(edge_key(a, b)) {
            return None;
        }

        let id = RoadId(self.roads.len() as u32);
        let road_index = self.roads.len();
        self.roads.push(Road {
            id,
            start: a,
            end: b,
        });
        self.incident[a.index()].push(road_index);
        self.incident[b.index()].push(road_index);
        Some(id)
    }

    pub fn are_connected(&self, a: IntersectionId, b: IntersectionId) -> bool {
        self.edges.contains(&edge_key(a, b))
    }

    pub fn contains(&self, id: IntersectionId) -> bool {
        id.index() < self.intersections.len()
    }

    pub fn intersection(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id.index())
    }

    pub fn position(&self, id: IntersectionId) -> Option<Vec3> {
        self.intersection(id).map(|i| i.position)
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn degree(&self, id: IntersectionId) -> usize {
        self.incident.get(id.index()).map_or(0, Vec::len)
    }

    /// Roads touching an intersection
    pub fn incident_roads(&self, id: IntersectionId) -> impl Iterator<Item = &Road> + '_ {
        self.incident
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|&road_index| &self.roads[road_index])
    }

    /// Intersections one road away
    pub fn neighbors(&self, id: IntersectionId) -> impl Iterator<Item = IntersectionId> + '_ {
        self.incident_roads(id).filter_map(move |road| road.other_end(id))
    }

    /// Euclidean length between a road's endpoints
    pub fn road_length(&self, road: &Road) -> f32 {
        match (self.position(road.start), self.position(road.end)) {
            (Some(a), Some(b)) => a.distance(b),
            _ => 0.0,
        }
    }

    pub fn total_length(&self) -> f32 {
        self.roads.iter().map(|road| self.road_length(road)).sum()
    }

    /// Nearest intersection within `tolerance` of `position`.
    ///
    /// Linear scan over every intersection; ties keep the lowest id.
    pub fn nearest_within(&self, position: Vec3, tolerance: f32) -> Option<IntersectionId> {
        let mut best: Option<(IntersectionId, f32)> = None;
        for intersection in &self.intersections {
            let distance = intersection.position.distance(position);
            if distance > tolerance {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((intersection.id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Rough heap footprint of the graph in bytes
    pub fn approx_memory_bytes(&self) -> usize {
        use std::mem::size_of;

        let incident_entries: usize = self.incident.iter().map(Vec::capacity).sum();
        self.intersections.capacity() * size_of::<Intersection>()
            + self.roads.capacity() * size_of::<Road>()
            + self.incident.capacity() * size_of::<Vec<usize>>()
            + incident_entries * size_of::<usize>()
            + self.edges.capacity() * size_of::<(IntersectionId, IntersectionId)>()
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    /// Check the invariants every generator must uphold
    pub fn assert_network_invariants(network: &RoadNetwork) {
        for (index, intersection) in network.intersections().iter().enumerate() {
            assert_eq!(intersection.id.index(), index, "ids must follow creation order");
            assert!(intersection.position.is_finite(), "position must be finite");
        }

        let mut seen = HashSet::new();
        for road in network.roads() {
            assert_ne!(road.start, road.end, "self-loop on road {}", road.id);
            assert!(network.contains(road.start), "dangling start on road {}", road.id);
            assert!(network.contains(road.end), "dangling end on road {}", road.id);
            assert!(
                seen.insert(edge_key(road.start, road.end)),
                "duplicate road between {} and {}",
                road.start,
                road.end
            );
        }
    }
}
