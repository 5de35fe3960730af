use dotgrid_core::{GrayImageView, ResponseMapView};
use log::debug;

use super::{seed_pixel, IntensityAccumulator};
use crate::feature::BlobFeature;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Growth stops once the response drops to this fraction of the seed response.
pub const GROWTH_THRESHOLD_FRAC: f32 = 0.1;

/// Estimate radius, ovality and intensity by growing runs from the seed.
///
/// From the seed pixel a run is grown independently right, left, up and down
/// while the next response is above 10 % of the seed response and does not
/// rise above the previous sample, up to `max_radius` pixels. A run stopped by
/// the response value (dropping to the threshold or rising) gets the linear
/// correction `threshold - value` added; boundary and `max_radius` stops get
/// none. The correction is in response units and is negative on a rise.
///
/// `diameter_x = left + right`, `diameter_y = up + down`; the radius is their
/// mean halved and `ovality = 1 - diameter_y / diameter_x` when
/// `diameter_x > 0` (otherwise the previous value is kept). The intensity is
/// averaged over the seed and every pixel a run passed.
///
/// `_min_response` is accepted for call-site compatibility and ignored.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(feature, spot_map, mono_image), fields(x = feature.position.x, y = feature.position.y))
)]
pub fn estimate_by_growth(
    feature: &mut BlobFeature,
    spot_map: &ResponseMapView<'_>,
    max_radius: u32,
    mono_image: &GrayImageView<'_>,
    _min_response: f32,
) {
    let seed = seed_pixel(feature.position);
    let Some(seed_response) = spot_map.get(seed.0, seed.1) else {
        debug!("growth seed {seed:?} outside the response map");
        return;
    };
    let threshold = seed_response * GROWTH_THRESHOLD_FRAC;

    let mut intensity = IntensityAccumulator::default();
    if let Some(v) = mono_image.get(seed.0, seed.1) {
        intensity.add(v);
    }

    let run = Run {
        spot_map,
        mono_image,
        seed,
        seed_response,
        threshold,
        max_radius,
    };
    let right = run.grow((1, 0), &mut intensity);
    let left = run.grow((-1, 0), &mut intensity);
    let up = run.grow((0, -1), &mut intensity);
    let down = run.grow((0, 1), &mut intensity);

    let diameter_x = left + right;
    let diameter_y = up + down;
    feature.average_radius = (diameter_x + diameter_y) / 4.0;
    if diameter_x > 0.0 {
        feature.ovality = Some(1.0 - diameter_y / diameter_x);
    }
    feature.average_intensity = intensity.mean().unwrap_or(0.0);
}

struct Run<'s, 'a> {
    spot_map: &'s ResponseMapView<'a>,
    mono_image: &'s GrayImageView<'a>,
    seed: (i32, i32),
    seed_response: f32,
    threshold: f32,
    max_radius: u32,
}

impl Run<'_, '_> {
    /// Run length along `step`, in pixels, including the stop correction.
    fn grow(&self, step: (i32, i32), intensity: &mut IntensityAccumulator) -> f32 {
        let mut len = 0u32;
        let mut prev = self.seed_response;
        loop {
            if len >= self.max_radius {
                return len as f32;
            }
            let k = len as i32 + 1;
            let x = self.seed.0.saturating_add(step.0 * k);
            let y = self.seed.1.saturating_add(step.1 * k);
            let Some(value) = self.spot_map.get(x, y) else {
                return len as f32;
            };
            if value <= self.threshold || value > prev {
                return len as f32 + (self.threshold - value);
            }
            len += 1;
            prev = value;
            if let Some(v) = self.mono_image.get(x, y) {
                intensity.add(v);
            }
        }
    }
}
