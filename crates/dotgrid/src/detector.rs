use dotgrid_core::{GrayImageView, ResponseMapView};
use log::{debug, info};
use nalgebra::Point2;
use serde::Serialize;

use crate::error::DotGridError;
use crate::feature::BlobFeature;
use crate::graph::BlobGraph;
use crate::lines::{extract_grid_lines, GridLine};
use crate::marks::PathMarks;
use crate::params::{DotGridParams, RadiusParams};
use crate::radius::RadiusEstimator;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Output of [`DotGridDetector::detect`].
#[derive(Clone, Debug, Serialize)]
pub struct DotGridDetection {
    pub graph: BlobGraph,
    pub lines: Vec<GridLine>,
    /// Features with an unusable radius; they are neither linked nor part of a line.
    pub garbage: Vec<usize>,
}

/// Seeds to features to linked graph to grid lines.
pub struct DotGridDetector {
    params: DotGridParams,
}

impl DotGridDetector {
    pub fn new(params: DotGridParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DotGridParams {
        &self.params
    }

    /// Run the full pipeline on seed positions over borrowed fields.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, seeds, spot_map, mono_image), fields(seeds = seeds.len()))
    )]
    pub fn detect(
        &self,
        seeds: &[Point2<f32>],
        spot_map: &ResponseMapView<'_>,
        mono_image: &GrayImageView<'_>,
    ) -> Result<DotGridDetection, DotGridError> {
        let estimator = RadiusEstimator::new(*spot_map, *mono_image)?;
        let radius = &self.params.radius;

        let mut graph = BlobGraph::new();
        let mut marks = PathMarks::new(seeds.len());
        for &seed in seeds {
            let feature = estimator.estimate(seed, radius);
            let unusable = is_unusable(feature.average_radius, radius);
            let id = graph.push(feature);
            if unusable {
                marks.mark_garbage(id);
            }
        }
        let garbage = marks.garbage_ids();
        debug!(
            "estimated {} features, {} flagged garbage",
            graph.len(),
            garbage.len()
        );

        let edges = graph.link_within_radius(self.params.graph.neighborhood_radius, Some(&marks));
        let lines = extract_grid_lines(&graph, &self.params.path, &self.params.lines, &mut marks);
        info!(
            "dot grid: {} features, {} edges, {} lines",
            graph.len(),
            edges,
            lines.len()
        );

        Ok(DotGridDetection {
            graph,
            lines,
            garbage,
        })
    }

    /// Same as [`Self::detect`] over raw row-major buffers.
    pub fn detect_raw(
        &self,
        width: usize,
        height: usize,
        spot_map: &[f32],
        mono_image: &[u8],
        seeds: &[Point2<f32>],
    ) -> Result<DotGridDetection, DotGridError> {
        let spot = ResponseMapView::new(width, height, spot_map)?;
        let mono = GrayImageView::new(width, height, mono_image)?;
        self.detect(seeds, &spot, &mono)
    }
}

fn is_unusable(radius: f32, params: &RadiusParams) -> bool {
    if !radius.is_finite() || radius <= 0.0 {
        return true;
    }
    params.reject_radius_outliers
        && (radius < params.min_radius as f32 || radius > params.max_radius as f32)
}

impl DotGridDetection {
    pub fn feature(&self, id: usize) -> Option<&BlobFeature> {
        self.graph.feature(id)
    }

    /// Feature positions along each line.
    pub fn line_points(&self) -> Vec<Vec<Point2<f32>>> {
        self.lines
            .iter()
            .map(|line| {
                line.nodes
                    .iter()
                    .filter_map(|&id| self.graph.feature(id).map(|f| f.interpolated_position))
                    .collect()
            })
            .collect()
    }
}
