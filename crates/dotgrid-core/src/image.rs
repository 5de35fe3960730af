//! Row-major pixel grids: 8-bit intensity images and `f32` response maps.
//!
//! Both come as a borrowed view (what the algorithms consume) and an owned
//! buffer (what tests and callers build). Integer accessors are
//! bounds-guarded and return `None` outside the grid.

use crate::error::FieldError;

#[inline]
fn checked_len(width: usize, height: usize, actual: usize) -> Result<(), FieldError> {
    let expected = width * height;
    if expected != actual {
        return Err(FieldError::SizeMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

#[inline]
fn index(width: usize, height: usize, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return None;
    }
    Some(y as usize * width + x as usize)
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FieldError> {
        checked_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        index(self.width, self.height, x, y).map(|i| self.data[i])
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FieldError> {
        checked_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Borrowed scalar response field, e.g. the output of a spot detector.
#[derive(Clone, Copy, Debug)]
pub struct ResponseMapView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [f32],
}

impl<'a> ResponseMapView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [f32]) -> Result<Self, FieldError> {
        checked_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        index(self.width, self.height, x, y).map(|i| self.data[i])
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

#[derive(Clone, Debug)]
pub struct ResponseMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ResponseMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Result<Self, FieldError> {
        checked_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a response map by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> ResponseMapView<'_> {
        ResponseMapView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

#[inline]
fn get_gray(src: &GrayImageView<'_>, x: i32, y: i32) -> u8 {
    src.get(x, y).unwrap_or(0)
}

/// True when `(x, y)` lies inside the pixel-center hull of the image, i.e.
/// all four bilinear taps are real pixels.
#[inline]
pub fn contains_subpixel(src: &GrayImageView<'_>, x: f32, y: f32) -> bool {
    x >= 0.0
        && y >= 0.0
        && x <= (src.width as f32 - 1.0)
        && y <= (src.height as f32 - 1.0)
}

/// Bilinear intensity sample; taps outside the image read as 0.
#[inline]
pub fn sample_bilinear(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_gray(src, x0, y0) as f32;
    let p10 = get_gray(src, x0 + 1, y0) as f32;
    let p01 = get_gray(src, x0, y0 + 1) as f32;
    let p11 = get_gray(src, x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_buffer_of_wrong_length() {
        let data = [0u8; 5];
        let err = GrayImageView::new(2, 3, &data).unwrap_err();
        assert_eq!(
            FieldError::SizeMismatch {
                width: 2,
                height: 3,
                expected: 6,
                actual: 5
            },
            err
        );
        assert!(ResponseMap::from_raw(4, 4, vec![0.0; 15]).is_err());
    }

    #[test]
    fn guarded_access_outside_grid() {
        let map = ResponseMap::from_fn(3, 2, |x, y| (x + 10 * y) as f32);
        let view = map.view();
        assert_eq!(Some(12.0), view.get(2, 1));
        assert_eq!(None, view.get(3, 1));
        assert_eq!(None, view.get(-1, 0));
        assert_eq!(None, view.get(0, 2));
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let img = GrayImage::from_raw(2, 2, vec![0, 100, 100, 200]).unwrap();
        let view = img.view();
        assert_abs_diff_eq!(100.0, sample_bilinear(&view, 0.5, 0.5), epsilon = 1e-4);
        assert_abs_diff_eq!(50.0, sample_bilinear(&view, 0.5, 0.0), epsilon = 1e-4);
        assert!(contains_subpixel(&view, 1.0, 1.0));
        assert!(!contains_subpixel(&view, 1.01, 0.0));
    }
}
