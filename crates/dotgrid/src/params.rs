use serde::{Deserialize, Serialize};

/// Which radius estimator refines a seed into a feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusMethod {
    /// Four-direction run-length growth over the response map.
    #[default]
    Growth,
    /// Displacement search for the strongest radial response edge.
    Displacement,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RadiusParams {
    pub method: RadiusMethod,
    /// Smallest ring radius scanned by the displacement search, pixels.
    pub min_radius: u32,
    /// Growth run cap and largest scanned ring radius, pixels.
    pub max_radius: u32,
    /// Half-size of the displacement search window, pixels.
    pub max_displacement: u32,
    /// Accepted for compatibility; growth derives its own threshold.
    pub min_response: f32,
    /// Angles per ring for radial profile sampling; 0 disables it.
    pub profile_angles: usize,
    /// Flag features whose radius falls outside `[min_radius, max_radius]`.
    pub reject_radius_outliers: bool,
}

impl Default for RadiusParams {
    fn default() -> Self {
        Self {
            method: RadiusMethod::Growth,
            min_radius: 2,
            max_radius: 20,
            max_displacement: 2,
            min_response: 0.0,
            profile_angles: 0,
            reject_radius_outliers: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphParams {
    /// Features closer than this are linked, pixels.
    pub neighborhood_radius: f32,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            neighborhood_radius: 50.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PathParams {
    /// Largest bearing deviation accepted for the next step, degrees.
    pub tolerance_deg: f32,
    /// Hard cap on walk steps.
    pub max_depth: usize,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            tolerance_deg: 10.0,
            max_depth: 1000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GridLineParams {
    /// Minimal number of features in an accepted line.
    pub min_line_len: usize,
}

impl Default for GridLineParams {
    fn default() -> Self {
        Self { min_line_len: 3 }
    }
}

/// Parameters for the whole detection pipeline.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DotGridParams {
    pub radius: RadiusParams,
    pub graph: GraphParams,
    pub path: PathParams,
    pub lines: GridLineParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let params: DotGridParams = serde_json::from_str(
            r#"{ "radius": { "method": "displacement", "max_radius": 12 },
                 "path": { "tolerance_deg": 5.0 } }"#,
        )
        .unwrap();
        assert_eq!(RadiusMethod::Displacement, params.radius.method);
        assert_eq!(12, params.radius.max_radius);
        assert_eq!(2, params.radius.min_radius);
        assert_eq!(5.0, params.path.tolerance_deg);
        assert_eq!(1000, params.path.max_depth);
        assert_eq!(50.0, params.graph.neighborhood_radius);
        assert_eq!(3, params.lines.min_line_len);
    }
}
