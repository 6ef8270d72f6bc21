use thiserror::Error;

/// Caller-side precondition failures. The dot product itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DotError {
    #[error("Shape mismatch: {0} vs {1}")]
    ShapeMismatch(usize, usize),
    #[error("Stride must be nonzero")]
    ZeroStride,
}
