use dotgrid_core::{GrayImageView, ResponseMapView};
use log::trace;
use nalgebra::Vector2;

use super::{seed_pixel, unit_circle, IntensityAccumulator};
use crate::feature::BlobFeature;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Samples per ring in the displacement search.
const RING_SAMPLES: usize = 10;

#[derive(Clone, Copy, Debug)]
struct Edge {
    change: f32,
    radius: f32,
    intensity: f32,
    shift: (i32, i32),
}

/// Find the strongest radial response edge over small seed displacements.
///
/// Every center `seed + (dx, dy)` with `|dx|, |dy| <= max_displacement` is
/// scanned with rings of radius `min_radius..=max_radius`, each summing the
/// response at 10 evenly spaced nearest pixels. The largest squared
/// two-radius change `(resp(r) - resp(r - 2))²` wins; its radius is refined
/// between `r - 1` and `r` by the weights of the two single-step changes.
///
/// The reported intensity is the mean of the ring samples taken up to the
/// winning radius around the winning center only; the running mean restarts
/// for every displacement.
///
/// The winning displacement recenters `position` and `interpolated_position`.
/// `ovality` is always set to `Some(0.0)`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(feature, spot_map, mono_image), fields(x = feature.position.x, y = feature.position.y))
)]
pub fn estimate_by_displacement(
    feature: &mut BlobFeature,
    spot_map: &ResponseMapView<'_>,
    min_radius: u32,
    max_radius: u32,
    max_displacement: u32,
    mono_image: &GrayImageView<'_>,
) {
    let ring = unit_circle(RING_SAMPLES);
    let seed = seed_pixel(feature.position);
    let md = max_displacement as i32;

    let mut best: Option<Edge> = None;
    for dy in -md..=md {
        for dx in -md..=md {
            let center = (seed.0.saturating_add(dx), seed.1.saturating_add(dy));
            let floor = best.map_or(0.0, |e| e.change);
            if let Some(edge) =
                strongest_edge(spot_map, mono_image, &ring, center, min_radius, max_radius, floor)
            {
                best = Some(Edge {
                    shift: (dx, dy),
                    ..edge
                });
            }
        }
    }

    if let Some(edge) = best {
        trace!(
            "displacement edge at r={:.2}, shift {:?}, change {:.3}",
            edge.radius,
            edge.shift,
            edge.change
        );
        feature.average_radius = edge.radius;
        feature.average_intensity = edge.intensity;
        let shift = Vector2::new(edge.shift.0 as f32, edge.shift.1 as f32);
        feature.position += shift;
        feature.interpolated_position += shift;
    }
    feature.ovality = Some(0.0);
}

/// Strongest edge around one center whose change exceeds `floor`.
fn strongest_edge(
    spot_map: &ResponseMapView<'_>,
    mono_image: &GrayImageView<'_>,
    ring: &[(f32, f32)],
    center: (i32, i32),
    min_radius: u32,
    max_radius: u32,
    floor: f32,
) -> Option<Edge> {
    let mut intensity = IntensityAccumulator::default();
    let mut mean_intensity = 0.0;
    // resp(r - 2), resp(r - 1)
    let mut history: [Option<f32>; 2] = [None, None];
    let mut best: Option<Edge> = None;
    let mut max_change = floor;

    for r in min_radius..=max_radius {
        let rf = r as f32;
        let mut response = 0.0f32;
        for &(cos_t, sin_t) in ring {
            let x = center.0.saturating_add((rf * cos_t).round() as i32);
            let y = center.1.saturating_add((rf * sin_t).round() as i32);
            if let Some(v) = spot_map.get(x, y) {
                response += v;
            }
            if let Some(v) = mono_image.get(x, y) {
                intensity.add(v);
            }
        }
        if let Some(mean) = intensity.mean() {
            mean_intensity = mean;
        }

        if let [Some(two_back), Some(one_back)] = history {
            let change = (response - two_back).powi(2);
            if change > max_change {
                max_change = change;
                let a = (two_back - one_back).abs();
                let b = (one_back - response).abs();
                let radius = if a + b > 0.0 {
                    ((rf - 1.0) * a + rf * b) / (a + b)
                } else {
                    rf
                };
                best = Some(Edge {
                    change,
                    radius,
                    intensity: mean_intensity,
                    shift: (0, 0),
                });
            }
        }
        history = [history[1], Some(response)];
    }
    best
}
