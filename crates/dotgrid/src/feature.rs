use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::direction::{bucket_for, DirectionIndex};

/// One directed edge from a feature to a neighbor in the same graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeighborEdge {
    /// Arena id of the neighbor.
    pub target: usize,
    /// Euclidean distance to the neighbor, pixels.
    pub separation: f32,
    /// Bearing to the neighbor, radians in `[0, 2π)`; see [`dotgrid_core::bearing`].
    pub bearing: f32,
}

/// A detected, roughly circular spot: position, shape and outgoing adjacency.
///
/// Shape fields start at their defaults and are filled once by one of the
/// radius estimators. `ovality` stays `None` until an estimator can
/// determine it (e.g. a zero horizontal diameter leaves it unset).
#[derive(Clone, Debug, Serialize)]
pub struct BlobFeature {
    /// Pixel-accurate detected location.
    pub position: Point2<f32>,
    /// Sub-pixel refined location.
    pub interpolated_position: Point2<f32>,
    pub average_radius: f32,
    /// `1 - vertical / horizontal` diameter; negative for tall blobs.
    pub ovality: Option<f32>,
    pub average_intensity: f32,
    /// Mean intensity per integer radius, when sampled.
    pub radial_profile: Vec<f32>,
    edges: Vec<NeighborEdge>,
    direction_index: DirectionIndex,
}

impl BlobFeature {
    pub fn new(position: Point2<f32>) -> Self {
        Self {
            position,
            interpolated_position: position,
            average_radius: 0.0,
            ovality: None,
            average_intensity: 0.0,
            radial_profile: Vec::new(),
            edges: Vec::new(),
            direction_index: DirectionIndex::default(),
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Point2::new(x, y))
    }

    /// Outgoing edges in insertion order.
    pub fn edges(&self) -> &[NeighborEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&NeighborEdge> {
        self.edges.get(index)
    }

    pub fn neighbor_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbor ids, index-aligned with [`Self::separations`] and [`Self::bearings`].
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.edges.iter().map(|e| e.target)
    }

    pub fn separations(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.edges.iter().map(|e| e.separation)
    }

    pub fn bearings(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.edges.iter().map(|e| e.bearing)
    }

    pub fn direction_index(&self) -> &DirectionIndex {
        &self.direction_index
    }

    /// Edges whose bearing falls in `bucket`.
    pub fn edges_in_bucket(&self, bucket: usize) -> impl Iterator<Item = &NeighborEdge> + '_ {
        self.direction_index
            .bucket(bucket)
            .iter()
            .filter_map(|&i| self.edges.get(i))
    }

    pub fn is_linked_to(&self, target: usize) -> bool {
        self.edges.iter().any(|e| e.target == target)
    }

    /// Distance between detected positions.
    pub fn distance_to(&self, other: &BlobFeature) -> f32 {
        (other.position - self.position).norm()
    }

    /// Append an edge and index it by bearing. Returns the new edge index.
    pub(crate) fn push_edge(&mut self, edge: NeighborEdge) -> usize {
        let index = self.edges.len();
        self.edges.push(edge);
        self.direction_index.insert(bucket_for(edge.bearing), index);
        index
    }
}
