//! JSON configuration and report helpers for dot-grid detection.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::detector::{DotGridDetection, DotGridDetector};
use crate::error::DotGridError;
use crate::feature::BlobFeature;
use crate::lines::GridLine;
use crate::params::DotGridParams;

#[derive(thiserror::Error, Debug)]
pub enum DotGridIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for a detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotGridConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub params: DotGridParams,
}

impl DotGridConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DotGridIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DotGridIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dotgrid_detect_report.json"))
    }

    pub fn build_detector(&self) -> DotGridDetector {
        DotGridDetector::new(self.params.clone())
    }
}

/// Flattened per-feature record for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub id: usize,
    pub position: [f32; 2],
    pub interpolated_position: [f32; 2],
    pub average_radius: f32,
    #[serde(default)]
    pub ovality: Option<f32>,
    pub average_intensity: f32,
    pub neighbors: Vec<usize>,
}

impl FeatureSummary {
    pub fn from_feature(id: usize, f: &BlobFeature) -> Self {
        Self {
            id,
            position: [f.position.x, f.position.y],
            interpolated_position: [f.interpolated_position.x, f.interpolated_position.y],
            average_radius: f.average_radius,
            ovality: f.ovality,
            average_intensity: f.average_intensity,
            neighbors: f.neighbors().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotGridReport {
    pub image_path: String,
    pub num_seeds: usize,
    #[serde(default)]
    pub features: Vec<FeatureSummary>,
    #[serde(default)]
    pub lines: Vec<GridLine>,
    #[serde(default)]
    pub garbage: Vec<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DotGridReport {
    /// Build a base report from the input config and seed count.
    pub fn new(cfg: &DotGridConfig, num_seeds: usize) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            num_seeds,
            features: Vec::new(),
            lines: Vec::new(),
            garbage: Vec::new(),
            error: None,
        }
    }

    /// Populate report fields from a successful detection.
    pub fn set_detection(&mut self, res: DotGridDetection) {
        self.features = res
            .graph
            .iter()
            .map(|(id, f)| FeatureSummary::from_feature(id, f))
            .collect();
        self.lines = res.lines;
        self.garbage = res.garbage;
        self.error = None;
    }

    /// Record a detection error.
    pub fn set_error(&mut self, err: DotGridError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DotGridIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DotGridIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
