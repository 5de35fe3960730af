//! Dot-grid detector built on top of `dotgrid-core`.
//!
//! ## Quickstart
//!
//! ```
//! use dotgrid::{DotGridDetector, DotGridParams};
//! use dotgrid_core::{GrayImage, ResponseMap};
//! use nalgebra::Point2;
//!
//! let spot = ResponseMap::new(64, 64);
//! let mono = GrayImage::new(64, 64);
//! let seeds = [Point2::new(32.0, 32.0)];
//!
//! let detector = DotGridDetector::new(DotGridParams::default());
//! let result = detector.detect(&seeds, &spot.view(), &mono.view()).unwrap();
//! println!("lines: {}", result.lines.len());
//! ```
//!
//! Pipeline:
//! 1. Refine every seed into a [`BlobFeature`]: radius, ovality and mean
//!    intensity from the spot-response map ([`RadiusEstimator`]).
//! 2. Flag features with an unusable radius as garbage.
//! 3. Link features closer than the neighborhood radius with directed edges
//!    carrying separation and bearing; each feature indexes its edges into 72
//!    direction buckets of 5°.
//! 4. Walk direction-continuous chains through the buckets and peel off the
//!    longest ones as grid lines.
//!
//! Transient walk state lives in a caller-owned [`PathMarks`], never on the
//! features.

mod detector;
mod direction;
mod error;
mod feature;
mod graph;
mod io;
mod lines;
mod marks;
mod params;
mod path;
pub mod radius;

pub use detector::{DotGridDetection, DotGridDetector};
pub use direction::{
    bucket_for, neighbouring_buckets, DirectionIndex, BUCKET_WIDTH_DEG, DIRECTION_BUCKETS,
};
pub use error::DotGridError;
pub use feature::{BlobFeature, NeighborEdge};
pub use graph::BlobGraph;
pub use io::{DotGridConfig, DotGridIoError, DotGridReport, FeatureSummary};
pub use lines::{extract_grid_lines, GridLine};
pub use marks::PathMarks;
pub use params::{DotGridParams, GraphParams, GridLineParams, PathParams, RadiusMethod, RadiusParams};
pub use path::{directional_length, longest_path, DirectionalWalk, LongestPath, WalkOptions};
pub use radius::RadiusEstimator;
