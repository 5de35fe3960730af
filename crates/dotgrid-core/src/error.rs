/// Errors raised when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("buffer of {actual} values does not match a {width}x{height} grid (expected {expected})")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
