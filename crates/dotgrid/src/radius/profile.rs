use dotgrid_core::{contains_subpixel, sample_bilinear, GrayImageView};

use super::unit_circle;
use crate::feature::BlobFeature;

/// Fill `feature.radial_profile` with the mean bilinear intensity on circles
/// of radius `0..=max_radius` around the sub-pixel position.
///
/// Samples outside the image are skipped; a ring without samples reads 0.
/// `angles == 0` clears the profile.
pub fn sample_radial_profile(
    feature: &mut BlobFeature,
    mono_image: &GrayImageView<'_>,
    max_radius: u32,
    angles: usize,
) {
    feature.radial_profile.clear();
    if angles == 0 {
        return;
    }
    let ring = unit_circle(angles);
    let c = feature.interpolated_position;
    feature.radial_profile.reserve(max_radius as usize + 1);
    for r in 0..=max_radius {
        let rf = r as f32;
        let mut sum = 0.0f32;
        let mut hits = 0usize;
        for &(cos_t, sin_t) in &ring {
            let x = c.x + rf * cos_t;
            let y = c.y + rf * sin_t;
            if !contains_subpixel(mono_image, x, y) {
                continue;
            }
            sum += sample_bilinear(mono_image, x, y);
            hits += 1;
        }
        feature
            .radial_profile
            .push(if hits > 0 { sum / hits as f32 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fields::dot_image;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn profile_drops_at_the_dot_rim() {
        let mono = dot_image(41, 41, 20.0, 20.0, 5.0, 200, 20);
        let mut f = BlobFeature::at(20.0, 20.0);
        sample_radial_profile(&mut f, &mono.view(), 10, 32);
        assert_eq!(11, f.radial_profile.len());
        assert_abs_diff_eq!(200.0, f.radial_profile[0], epsilon = 1e-3);
        assert_abs_diff_eq!(200.0, f.radial_profile[3], epsilon = 1e-3);
        assert_abs_diff_eq!(20.0, f.radial_profile[8], epsilon = 1e-3);
        assert!(f.radial_profile[4] > f.radial_profile[7]);
    }

    #[test]
    fn rings_outside_the_image_read_zero() {
        let mono = dot_image(10, 10, 0.0, 0.0, 3.0, 90, 90);
        let mut f = BlobFeature::at(0.0, 0.0);
        sample_radial_profile(&mut f, &mono.view(), 20, 8);
        assert_abs_diff_eq!(90.0, f.radial_profile[2], epsilon = 1e-3);
        assert_eq!(0.0, f.radial_profile[20]);
    }

    #[test]
    fn zero_angles_clear_the_profile() {
        let mono = dot_image(10, 10, 5.0, 5.0, 2.0, 90, 10);
        let mut f = BlobFeature::at(5.0, 5.0);
        f.radial_profile = vec![1.0, 2.0];
        sample_radial_profile(&mut f, &mono.view(), 4, 0);
        assert!(f.radial_profile.is_empty());
    }
}
