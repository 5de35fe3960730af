//! Row/column reconstruction from longest direction-continuous chains.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::graph::BlobGraph;
use crate::marks::PathMarks;
use crate::params::{GridLineParams, PathParams};
use crate::path::{directional_length, longest_path, WalkOptions};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One accepted grid line: feature ids in walk order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub nodes: Vec<usize>,
    /// Walk bearing from the first node, radians.
    pub bearing: f32,
}

impl GridLine {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    start: usize,
    length: usize,
    bearing: f32,
}

/// Greedily peel the longest chains off the graph.
///
/// Every round runs [`longest_path`] from each start that is not selected,
/// touched or garbage and keeps the first strictly longest chain. A start
/// whose best chain has fewer than `min_line_len` nodes (or no step at all)
/// is touched and skipped in later rounds. The winning chain is walked again
/// with marking so its features are excluded from later lines. Stops when no
/// start qualifies.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(graph, path, lines, marks), fields(features = graph.len()))
)]
pub fn extract_grid_lines(
    graph: &BlobGraph,
    path: &PathParams,
    lines: &GridLineParams,
    marks: &mut PathMarks,
) -> Vec<GridLine> {
    marks.ensure_len(graph.len());
    let mut out = Vec::new();

    loop {
        let mut best: Option<Candidate> = None;
        for start in 0..graph.len() {
            if marks.is_selected(start) || marks.is_touched(start) || marks.is_garbage(start) {
                continue;
            }
            let chain = longest_path(graph, start, false, path, marks);
            let bearing = match chain.bearing {
                Some(b) if chain.length > 0 && chain.length + 1 >= lines.min_line_len => b,
                _ => {
                    marks.touch(start);
                    continue;
                }
            };
            if best.is_none_or(|b| chain.length > b.length) {
                best = Some(Candidate {
                    start,
                    length: chain.length,
                    bearing,
                });
            }
        }
        let Some(winner) = best else {
            break;
        };

        let opts = WalkOptions {
            mark_path: true,
            ..WalkOptions::from_params(path)
        };
        let walk = directional_length(graph, winner.start, winner.bearing, opts, marks);
        debug!(
            "grid line {} from feature {}: {} nodes at {:.1} deg",
            out.len(),
            winner.start,
            walk.nodes.len(),
            winner.bearing.to_degrees()
        );
        out.push(GridLine {
            nodes: walk.nodes,
            bearing: winner.bearing,
        });
    }
    out
}
