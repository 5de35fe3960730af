//! Radius, shape and intensity estimation for seeded blobs.
//!
//! Two independent estimators read a spot-response map and a same-sized
//! intensity image:
//! - [`estimate_by_growth`]: run lengths grown right/left/up/down from the seed,
//! - [`estimate_by_displacement`]: a discrete radial-derivative peak search over
//!   small seed displacements, which also recenters the feature.
//!
//! Neither can fail: every pixel access is bounds-guarded and outputs that
//! cannot be determined are left at their defaults.

mod displacement;
mod growth;
mod profile;

pub use displacement::estimate_by_displacement;
pub use growth::{estimate_by_growth, GROWTH_THRESHOLD_FRAC};
pub use profile::sample_radial_profile;

use dotgrid_core::{GrayImageView, ResponseMapView};
use nalgebra::Point2;

use crate::error::DotGridError;
use crate::feature::BlobFeature;
use crate::params::{RadiusMethod, RadiusParams};

/// Borrowed inputs shared by the radius estimators.
#[derive(Clone, Copy, Debug)]
pub struct RadiusEstimator<'a> {
    spot_map: ResponseMapView<'a>,
    mono_image: GrayImageView<'a>,
}

impl<'a> RadiusEstimator<'a> {
    /// Both fields must cover the same pixel grid.
    pub fn new(
        spot_map: ResponseMapView<'a>,
        mono_image: GrayImageView<'a>,
    ) -> Result<Self, DotGridError> {
        if spot_map.dims() != mono_image.dims() {
            return Err(DotGridError::SizeMismatch {
                spot: spot_map.dims(),
                mono: mono_image.dims(),
            });
        }
        Ok(Self {
            spot_map,
            mono_image,
        })
    }

    pub fn spot_map(&self) -> &ResponseMapView<'a> {
        &self.spot_map
    }

    pub fn mono_image(&self) -> &GrayImageView<'a> {
        &self.mono_image
    }

    /// Create a feature at `seed` and fill its shape with the configured method.
    pub fn estimate(&self, seed: Point2<f32>, params: &RadiusParams) -> BlobFeature {
        let mut feature = BlobFeature::new(seed);
        match params.method {
            RadiusMethod::Growth => estimate_by_growth(
                &mut feature,
                &self.spot_map,
                params.max_radius,
                &self.mono_image,
                params.min_response,
            ),
            RadiusMethod::Displacement => estimate_by_displacement(
                &mut feature,
                &self.spot_map,
                params.min_radius,
                params.max_radius,
                params.max_displacement,
                &self.mono_image,
            ),
        }
        if params.profile_angles > 0 {
            sample_radial_profile(
                &mut feature,
                &self.mono_image,
                params.max_radius,
                params.profile_angles,
            );
        }
        feature
    }
}

/// Unit vectors at `samples` evenly spaced angles, starting at +x.
pub(crate) fn unit_circle(samples: usize) -> Vec<(f32, f32)> {
    let step = std::f32::consts::TAU / samples.max(1) as f32;
    (0..samples)
        .map(|k| {
            let (sin_t, cos_t) = (k as f32 * step).sin_cos();
            (cos_t, sin_t)
        })
        .collect()
}

/// Seed pixel of a floating-point position.
#[inline]
pub(crate) fn seed_pixel(p: Point2<f32>) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Running mean of 8-bit intensity samples.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct IntensityAccumulator {
    sum: f32,
    hits: usize,
}

impl IntensityAccumulator {
    #[inline]
    pub(crate) fn add(&mut self, value: u8) {
        self.sum += value as f32;
        self.hits += 1;
    }

    pub(crate) fn mean(&self) -> Option<f32> {
        (self.hits > 0).then(|| self.sum / self.hits as f32)
    }
}


#[cfg(test)]
mod tests {
    use super::test_fields::{cone, dot_image};
    use super::*;
    use approx::assert_abs_diff_eq;
    use dotgrid_core::{GrayImage, ResponseMap};

    #[test]
    fn estimator_rejects_mismatched_fields() {
        let spot = ResponseMap::new(10, 10);
        let mono = GrayImage::new(10, 9);
        let err = RadiusEstimator::new(spot.view(), mono.view()).unwrap_err();
        assert!(matches!(
            err,
            DotGridError::SizeMismatch {
                spot: (10, 10),
                mono: (10, 9)
            }
        ));
    }

    #[test]
    fn estimate_dispatches_on_method() {
        let spot = cone(40, 40, 20.0, 20.0, 5.0, 5.0);
        let mono = dot_image(40, 40, 20.0, 20.0, 5.0, 200, 20);
        let est = RadiusEstimator::new(spot.view(), mono.view()).unwrap();

        let growth = est.estimate(Point2::new(20.0, 20.0), &RadiusParams::default());
        assert_abs_diff_eq!(4.1, growth.average_radius, epsilon = 1e-4);
        assert!(growth.radial_profile.is_empty());

        let params = RadiusParams {
            method: RadiusMethod::Displacement,
            max_radius: 10,
            max_displacement: 0,
            profile_angles: 16,
            ..RadiusParams::default()
        };
        let disp = est.estimate(Point2::new(20.0, 20.0), &params);
        assert_eq!(Some(0.0), disp.ovality);
        assert_eq!(11, disp.radial_profile.len());
    }

    #[test]
    fn unit_circle_starts_on_x_axis() {
        let dirs = unit_circle(4);
        assert_eq!(4, dirs.len());
        assert_abs_diff_eq!(1.0, dirs[0].0, epsilon = 1e-6);
        assert_abs_diff_eq!(1.0, dirs[1].1, epsilon = 1e-6);
        assert!(unit_circle(0).is_empty());
    }
}
