//! # reprodot-math
//!
//! Exact integer building blocks for the reproducible dot product.
//!
//! This crate provides:
//! - [`Decoded`]: bit-level classification of an IEEE-754 binary64 value into
//!   NaN / Infinite / Zero / Subnormal / Normal, with `value = ±S·2^E` for finite terms
//! - [`BigAccumulator`]: a fixed-width (66 × 64-bit limbs) unsigned binary fixed-point
//!   integer wide enough to hold any sum of binary64 products without rounding
//!
//! **No floating-point arithmetic, no allocation, `no_std`**: everything here is
//! shifts, masks and carries on integer reinterpretations of `f64`.

#![cfg_attr(not(test), no_std)]

pub mod big_accumulator;
pub mod ieee;

pub use big_accumulator::{
    AccumulatorOverflow, BigAccumulator, LIMBS, LIMB_BITS, MAX_PRODUCT_EXPONENT, MIN_EXPONENT,
    PRODUCT_SIGNIFICAND_BITS, SPAN_BITS,
};
pub use ieee::{Decoded, Product, Term};
