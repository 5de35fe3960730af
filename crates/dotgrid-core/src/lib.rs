//! Core types and utilities for dot-pattern target detection.
//!
//! This crate is intentionally small: pixel-grid views over intensity images
//! and spot-response maps, bilinear sampling, and bearing helpers. It does
//! *not* depend on any concrete image library or spot detector.

mod angle;
mod error;
mod image;

pub use angle::{angle_diff_abs, bearing, wrap_two_pi};
pub use error::FieldError;
pub use image::{
    contains_subpixel, sample_bilinear, GrayImage, GrayImageView, ResponseMap, ResponseMapView,
};
