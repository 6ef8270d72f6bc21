//! # reprodot-core
//!
//! Reproducible double-precision dot product.
//!
//! [`ddot`] returns the correctly rounded (nearest, ties-to-even) value of the
//! exact sum of `x[i] · y[i]`, bit-identical for any summation order, platform or
//! compiler. Every product is accumulated exactly into fixed-width integers from
//! [`reprodot_math`]; the only rounding is one conversion at the end.
//!
//! - [`DotAccumulator`]: streaming, mergeable state (`push` / `merge` / `finish`)
//! - [`ExceptionFlags`]: NaN / 0×∞ / ±∞ / saturation tracking and resolution order
//! - [`rounding`]: exact integer → binary64 conversion, subnormals and overflow included
//!
//! No floating-point arithmetic is performed anywhere in the pipeline, so FMA
//! contraction or fast-math settings cannot change results.

pub mod dot;
pub mod error;
pub mod exceptions;
pub mod rounding;

pub use dot::{ddot, ddot_strided, try_ddot, try_ddot_strided, DotAccumulator};
pub use error::DotError;
pub use exceptions::{ExceptionFlags, Resolution};
