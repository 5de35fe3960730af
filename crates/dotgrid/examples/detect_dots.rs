use std::{env, path::Path, path::PathBuf};

use dotgrid::{DotGridConfig, DotGridReport};
use dotgrid_core::{GrayImage, ResponseMap};
use image::ImageReader;
use nalgebra::Point2;

/// Half-size of the box window used for the local background estimate.
const BOX_HALF: i32 = 6;
/// Seeds must reach this fraction of the strongest response.
const SEED_REL_THRESHOLD: f32 = 0.3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = parse_config_path();
    let cfg = DotGridConfig::load_json(&config_path)?;

    let img = load_image(Path::new(&cfg.image_path))?;
    let mono = GrayImage::from_raw(img.width() as usize, img.height() as usize, img.into_raw())?;
    let spot = dark_spot_response(&mono);
    let seeds = local_maxima(&spot, SEED_REL_THRESHOLD);
    log::info!("{} seeds from {}", seeds.len(), cfg.image_path);

    let mut report = DotGridReport::new(&cfg, seeds.len());
    match cfg
        .build_detector()
        .detect(&seeds, &spot.view(), &mono.view())
    {
        Ok(res) => report.set_detection(res),
        Err(err) => report.set_error(err),
    }

    let output_path = cfg.output_path();
    report.write_json(&output_path)?;
    println!("wrote detection JSON to {}", output_path.display());
    Ok(())
}

fn parse_config_path() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/dotgrid_config.json"))
}

fn load_image(path: &Path) -> Result<image::GrayImage, Box<dyn std::error::Error>> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// How much darker each pixel is than its box-filtered surroundings, in `[0, 1]`.
fn dark_spot_response(mono: &GrayImage) -> ResponseMap {
    let view = mono.view();
    ResponseMap::from_fn(mono.width, mono.height, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let mut sum = 0.0f32;
        let mut n = 0usize;
        for dy in -BOX_HALF..=BOX_HALF {
            for dx in -BOX_HALF..=BOX_HALF {
                if let Some(v) = view.get(x + dx, y + dy) {
                    sum += v as f32;
                    n += 1;
                }
            }
        }
        let center = view.get(x, y).map_or(0.0, f32::from);
        let mean = if n > 0 { sum / n as f32 } else { center };
        ((mean - center) / 255.0).max(0.0)
    })
}

/// Strict 3x3 local maxima above `rel` times the global maximum.
fn local_maxima(spot: &ResponseMap, rel: f32) -> Vec<Point2<f32>> {
    let view = spot.view();
    let max = spot.data.iter().copied().fold(0.0f32, f32::max);
    let threshold = max * rel;
    let mut seeds = Vec::new();
    if max <= 0.0 {
        return seeds;
    }
    for y in 0..spot.height as i32 {
        for x in 0..spot.width as i32 {
            let Some(v) = view.get(x, y) else { continue };
            if v < threshold {
                continue;
            }
            let is_peak = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                .filter(|&d| d != (0, 0))
                .all(|(dx, dy)| {
                    let n = view.get(x + dx, y + dy).unwrap_or(f32::MIN);
                    // Ties resolve to the first pixel in scan order.
                    if (dy, dx) < (0, 0) {
                        v > n
                    } else {
                        v >= n
                    }
                });
            if is_peak {
                seeds.push(Point2::new(x as f32, y as f32));
            }
        }
    }
    seeds
}
