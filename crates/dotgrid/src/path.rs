//! Direction-continuous walks over a [`BlobGraph`].
//!
//! A walk starts at a feature and repeatedly steps to the outgoing neighbor
//! whose bearing best matches a fixed direction, as long as the deviation
//! stays below the tolerance. The direction is never updated from the edges
//! taken, which limits drift along grid rows but does not follow curved
//! chains. Walks are iterative and hard capped by `max_depth`.

use dotgrid_core::angle_diff_abs;
use serde::{Deserialize, Serialize};

use crate::direction::{bucket_for, neighbouring_buckets};
use crate::feature::BlobFeature;
use crate::graph::BlobGraph;
use crate::marks::PathMarks;
use crate::params::PathParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Knobs of a single directional walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkOptions {
    /// Select every visited feature in the marks.
    pub mark_path: bool,
    /// Never step onto a feature that is already selected.
    pub ignore_selected: bool,
    /// Depth of the start feature; steps stop once `depth == max_depth`.
    pub depth: usize,
    pub max_depth: usize,
    pub tolerance_deg: f32,
}

impl WalkOptions {
    pub fn from_params(params: &PathParams) -> Self {
        Self {
            mark_path: false,
            ignore_selected: true,
            depth: 0,
            max_depth: params.max_depth,
            tolerance_deg: params.tolerance_deg,
        }
    }
}

/// Result of [`directional_length`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionalWalk {
    /// Number of steps taken.
    pub length: usize,
    /// Last feature reached, `None` when no step was taken.
    pub end: Option<usize>,
    /// Visited features in order, start included.
    pub nodes: Vec<usize>,
}

/// Result of [`longest_path`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LongestPath {
    pub length: usize,
    pub end: Option<usize>,
    /// Bearing of the winning walk.
    pub bearing: Option<f32>,
    /// Features along the winning walk, start included.
    pub nodes: Vec<usize>,
}

/// Walk from `start` along `direction` (radians).
///
/// At every feature: select it when `mark_path`; then, while below
/// `max_depth`, look at the direction bucket of `direction` and its two
/// neighbours and step to the edge target with the smallest bearing deviation
/// under the tolerance. Targets already selected are skipped when
/// `ignore_selected`. The walk ends when no candidate qualifies or the best
/// candidate is the current feature itself.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(graph, marks), fields(features = graph.len()))
)]
pub fn directional_length(
    graph: &BlobGraph,
    start: usize,
    direction: f32,
    opts: WalkOptions,
    marks: &mut PathMarks,
) -> DirectionalWalk {
    let mut walk = DirectionalWalk::default();
    if graph.feature(start).is_none() {
        return walk;
    }
    marks.ensure_len(graph.len());

    let bucket = bucket_for(direction);
    let tolerance = opts.tolerance_deg.to_radians();
    let features = graph.features();

    let mut current = start;
    let mut depth = opts.depth;
    loop {
        walk.nodes.push(current);
        if opts.mark_path {
            marks.select(current);
        }
        if depth >= opts.max_depth {
            break;
        }
        let next = best_step(
            &features[current],
            bucket,
            direction,
            tolerance,
            opts.ignore_selected,
            marks,
        );
        match next {
            Some(next) if next != current => {
                walk.length += 1;
                walk.end = Some(next);
                current = next;
                depth += 1;
            }
            _ => break,
        }
    }
    walk
}

fn best_step(
    feature: &BlobFeature,
    bucket: usize,
    direction: f32,
    tolerance: f32,
    ignore_selected: bool,
    marks: &PathMarks,
) -> Option<usize> {
    let mut best = None;
    let mut tol = tolerance;
    for b in neighbouring_buckets(bucket) {
        for edge in feature.edges_in_bucket(b) {
            if ignore_selected && marks.is_selected(edge.target) {
                continue;
            }
            let diff = angle_diff_abs(edge.bearing, direction);
            if diff < tol {
                tol = diff;
                best = Some(edge.target);
            }
        }
    }
    best
}

/// Longest direction-continuous chain starting at `start`.
///
/// Every outgoing edge bearing of `start` is tried (skipping selected
/// features); the first strictly longest walk wins. With `mark_path` and a
/// non-empty result the winning walk is repeated with marking enabled, which
/// selects every feature on the chain.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(graph, params, marks))
)]
pub fn longest_path(
    graph: &BlobGraph,
    start: usize,
    mark_path: bool,
    params: &PathParams,
    marks: &mut PathMarks,
) -> LongestPath {
    let mut best = LongestPath::default();
    let Some(feature) = graph.feature(start) else {
        return best;
    };

    let opts = WalkOptions::from_params(params);
    for edge in feature.edges() {
        let walk = directional_length(graph, start, edge.bearing, opts, marks);
        if walk.length > best.length {
            best = LongestPath {
                length: walk.length,
                end: walk.end,
                bearing: Some(edge.bearing),
                nodes: walk.nodes,
            };
        }
    }

    if let Some(bearing) = best.bearing.filter(|_| mark_path) {
        let marking = WalkOptions {
            mark_path: true,
            ..opts
        };
        directional_length(graph, start, bearing, marking, marks);
    }
    best
}
