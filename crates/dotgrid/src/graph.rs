use dotgrid_core::bearing;
use kiddo::{KdTree, SquaredEuclidean};
use log::{debug, warn};
use serde::Serialize;

use crate::feature::{BlobFeature, NeighborEdge};
use crate::marks::PathMarks;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Arena of blob features linked by directed, bearing-indexed edges.
///
/// Features are addressed by their insertion index. Edges are only ever
/// appended; an edge `a → b` never implies `b → a`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BlobGraph {
    features: Vec<BlobFeature>,
}

impl BlobGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(features: Vec<BlobFeature>) -> Self {
        Self { features }
    }

    /// Add a feature; returns its id.
    pub fn push(&mut self, feature: BlobFeature) -> usize {
        self.features.push(feature);
        self.features.len() - 1
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, id: usize) -> Option<&BlobFeature> {
        self.features.get(id)
    }

    pub fn feature_mut(&mut self, id: usize) -> Option<&mut BlobFeature> {
        self.features.get_mut(id)
    }

    pub fn features(&self) -> &[BlobFeature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BlobFeature)> + '_ {
        self.features.iter().enumerate()
    }

    pub fn into_features(self) -> Vec<BlobFeature> {
        self.features
    }

    pub fn edge_count(&self) -> usize {
        self.features.iter().map(BlobFeature::neighbor_count).sum()
    }

    /// Distance between the detected positions of two features.
    pub fn distance(&self, a: usize, b: usize) -> Option<f32> {
        Some(self.feature(a)?.distance_to(self.feature(b)?))
    }

    /// Append the edge `from → to` unconditionally.
    ///
    /// Returns the new edge index on `from`, or `None` when either id is not
    /// in the arena. Coincident positions get bearing 0.
    pub fn add_neighbour(&mut self, from: usize, to: usize) -> Option<usize> {
        let (Some(src), Some(dst)) = (self.features.get(from), self.features.get(to)) else {
            debug!("add_neighbour: id out of range ({from} -> {to}, len {})", self.len());
            return None;
        };
        let delta = dst.position - src.position;
        let separation = delta.norm();
        let mut angle = bearing(delta.x, delta.y);
        if !angle.is_finite() {
            warn!("non-finite bearing on edge {from} -> {to}, using 0");
            angle = 0.0;
        }
        let edge = NeighborEdge {
            target: to,
            separation,
            bearing: angle,
        };
        Some(self.features[from].push_edge(edge))
    }

    /// Append `from → to` only when the features are closer than
    /// `neighborhood_radius`. Returns whether an edge was added.
    pub fn add_neighbour_within(&mut self, from: usize, to: usize, neighborhood_radius: f32) -> bool {
        match self.distance(from, to) {
            Some(d) if d < neighborhood_radius => self.add_neighbour(from, to).is_some(),
            _ => false,
        }
    }

    /// Link every ordered pair of features closer than `neighborhood_radius`.
    ///
    /// Edges are added in both directions, per source in ascending target
    /// order. Features flagged garbage in `marks` (if given) and features with
    /// non-finite positions are skipped. Returns the number of edges added.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, marks), fields(features = self.features.len()))
    )]
    pub fn link_within_radius(
        &mut self,
        neighborhood_radius: f32,
        marks: Option<&PathMarks>,
    ) -> usize {
        if self.features.is_empty()
            || neighborhood_radius.is_nan()
            || neighborhood_radius <= 0.0
        {
            return 0;
        }
        let skip = |id: usize, f: &BlobFeature| {
            marks.is_some_and(|m| m.is_garbage(id))
                || !f.position.x.is_finite()
                || !f.position.y.is_finite()
        };

        let mut ids = Vec::with_capacity(self.features.len());
        let mut coords = Vec::with_capacity(self.features.len());
        for (id, f) in self.features.iter().enumerate() {
            if !skip(id, f) {
                ids.push(id);
                coords.push([f.position.x, f.position.y]);
            }
        }
        if coords.is_empty() {
            return 0;
        }
        let tree: KdTree<f32, 2> = (&coords).into();
        let radius_sq = neighborhood_radius * neighborhood_radius;

        let mut added = 0;
        for (slot, &from) in ids.iter().enumerate() {
            let mut targets: Vec<usize> = tree
                .within_unsorted::<SquaredEuclidean>(&coords[slot], radius_sq)
                .into_iter()
                .map(|nn| ids[nn.item as usize])
                .filter(|&to| to != from)
                .collect();
            targets.sort_unstable();
            for to in targets {
                if self.add_neighbour_within(from, to, neighborhood_radius) {
                    added += 1;
                }
            }
        }
        debug!(
            "linked {} features within {:.1}px: {} edges",
            ids.len(),
            neighborhood_radius,
            added
        );
        added
    }
}
