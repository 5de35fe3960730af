use dotgrid_core::FieldError;

/// Errors returned by the dot-grid detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DotGridError {
    #[error("response map is {}x{} but intensity image is {}x{}", spot.0, spot.1, mono.0, mono.1)]
    SizeMismatch {
        spot: (usize, usize),
        mono: (usize, usize),
    },
    #[error(transparent)]
    Field(#[from] FieldError),
}
