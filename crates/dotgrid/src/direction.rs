//! Bearing-bucketed index over a feature's outgoing edges.

use dotgrid_core::wrap_two_pi;
use serde::Serialize;

/// Angular width of one direction bucket, degrees.
pub const BUCKET_WIDTH_DEG: f32 = 5.0;

/// Number of direction buckets covering a full turn (360 / 5).
pub const DIRECTION_BUCKETS: usize = 72;

/// Bucket of a bearing (radians): `round(degrees / 5)`, clamped to the last
/// bucket. Non-finite bearings land in bucket 0.
#[inline]
pub fn bucket_for(bearing: f32) -> usize {
    let b = (wrap_two_pi(bearing).to_degrees() / BUCKET_WIDTH_DEG).round();
    if !b.is_finite() || b < 0.0 {
        return 0;
    }
    (b as usize).min(DIRECTION_BUCKETS - 1)
}

/// `bucket` and its two angular neighbours, wrapping around the circle.
#[inline]
pub fn neighbouring_buckets(bucket: usize) -> [usize; 3] {
    let b = bucket % DIRECTION_BUCKETS;
    [
        (b + DIRECTION_BUCKETS - 1) % DIRECTION_BUCKETS,
        b,
        (b + 1) % DIRECTION_BUCKETS,
    ]
}

/// Edge indices grouped by the bucket of their bearing.
#[derive(Clone, Debug, Serialize)]
pub struct DirectionIndex {
    buckets: Vec<Vec<usize>>,
}

impl Default for DirectionIndex {
    fn default() -> Self {
        Self {
            buckets: vec![Vec::new(); DIRECTION_BUCKETS],
        }
    }
}

impl DirectionIndex {
    pub(crate) fn insert(&mut self, bucket: usize, edge: usize) {
        self.buckets[bucket.min(DIRECTION_BUCKETS - 1)].push(edge);
    }

    /// Edge indices stored in `bucket` (empty when out of range).
    pub fn bucket(&self, bucket: usize) -> &[usize] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(bucket, edge indices)` over non-empty buckets.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(k, edges)| (k, edges.as_slice()))
    }

    /// Total number of indexed edges.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}
