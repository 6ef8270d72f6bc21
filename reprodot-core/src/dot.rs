use std::cmp::Ordering;

use reprodot_math::ieee;
use reprodot_math::{BigAccumulator, Decoded, Product, MIN_EXPONENT};

use crate::error::DotError;
use crate::exceptions::{ExceptionFlags, Resolution};
use crate::rounding;

/// Exact running state of a dot product: positive and negative partial sums
/// held as fixed-point integers, plus the exceptional-condition flags.
///
/// Both accumulators only ever grow until [`finish`](Self::finish), so any
/// split of the input into ranges, accumulated separately and combined with
/// [`merge`](Self::merge), yields the same bits as one linear pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DotAccumulator {
    pos: BigAccumulator,
    neg: BigAccumulator,
    flags: ExceptionFlags,
}

impl DotAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> &ExceptionFlags {
        &self.flags
    }

    pub fn positive(&self) -> &BigAccumulator {
        &self.pos
    }

    pub fn negative(&self) -> &BigAccumulator {
        &self.neg
    }

    /// Accumulate one `x · y` term.
    pub fn push(&mut self, x: f64, y: f64) {
        let dx = Decoded::from_f64(x);
        let dy = Decoded::from_f64(y);

        if dx.is_nan() || dy.is_nan() {
            self.flags.saw_nan = true;
            return;
        }
        if (dx.is_infinite() && dy.is_zero()) || (dx.is_zero() && dy.is_infinite()) {
            self.flags.saw_invalid_zero_inf = true;
            return;
        }
        if dx.is_infinite() || dy.is_infinite() {
            if dx.is_negative() ^ dy.is_negative() {
                self.flags.saw_neg_inf = true;
            } else {
                self.flags.saw_pos_inf = true;
            }
            return;
        }

        // A zero operand contributes nothing
        if let (Some(tx), Some(ty)) = (dx.term(), dy.term()) {
            self.accumulate(tx.product(ty));
        }
    }

    fn accumulate(&mut self, product: Product) {
        // Terms below the accumulator floor are dropped. With the floor at the
        // smallest possible product exponent this cannot trigger for decoded doubles.
        if product.exponent < MIN_EXPONENT {
            return;
        }
        let shift = (product.exponent - MIN_EXPONENT) as usize;
        let target = if product.negative { &mut self.neg } else { &mut self.pos };
        if target.add_shifted(product.significand, shift).is_err() {
            self.flags.overflowed_accumulator = true;
        }
    }

    /// Fold another partial state into this one.
    pub fn merge(&mut self, other: &Self) {
        if self.pos.add_assign(&other.pos).is_err() {
            self.flags.overflowed_accumulator = true;
        }
        if self.neg.add_assign(&other.neg).is_err() {
            self.flags.overflowed_accumulator = true;
        }
        self.flags.merge(&other.flags);
    }

    /// Resolve exceptional conditions and round the exact sum once.
    pub fn finish(&self) -> f64 {
        match self.flags.resolve() {
            Resolution::Invalid => ieee::quiet_nan(),
            Resolution::Infinite { negative } => ieee::infinity(negative),
            Resolution::Saturated => match self.pos.compare(&self.neg) {
                Ordering::Greater => ieee::infinity(false),
                Ordering::Less => ieee::infinity(true),
                Ordering::Equal => ieee::zero(false),
            },
            Resolution::Finite => rounding::round_difference(&self.pos, &self.neg),
        }
    }
}

impl Extend<(f64, f64)> for DotAccumulator {
    fn extend<I: IntoIterator<Item = (f64, f64)>>(&mut self, pairs: I) {
        for (x, y) in pairs {
            self.push(x, y);
        }
    }
}

impl FromIterator<(f64, f64)> for DotAccumulator {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Self {
        let mut acc = Self::new();
        acc.extend(pairs);
        acc
    }
}

/// Reproducible double-precision dot product: `x^T · y`, correctly rounded.
///
/// The result is bit-identical for any ordering of the index pairs. `x` and `y`
/// must have equal length; use [`try_ddot`] when that is not already known.
pub fn ddot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "ddot operands differ in length");
    x.iter().copied().zip(y.iter().copied()).collect::<DotAccumulator>().finish()
}

/// [`ddot`] with the length precondition checked.
pub fn try_ddot(x: &[f64], y: &[f64]) -> Result<f64, DotError> {
    if x.len() != y.len() {
        return Err(DotError::ShapeMismatch(x.len(), y.len()));
    }
    Ok(ddot(x, y))
}

/// CBLAS-shaped variant: uses `x[i * incx]` and `y[i * incy]` for `i < n`.
///
/// Increments must be nonzero and both slices long enough for `n` elements;
/// [`try_ddot_strided`] checks this.
pub fn ddot_strided(n: usize, x: &[f64], incx: usize, y: &[f64], incy: usize) -> f64 {
    debug_assert!(incx > 0 && incy > 0, "ddot_strided needs nonzero increments");
    x.iter()
        .step_by(incx.max(1))
        .zip(y.iter().step_by(incy.max(1)))
        .take(n)
        .map(|(&a, &b)| (a, b))
        .collect::<DotAccumulator>()
        .finish()
}

pub fn try_ddot_strided(
    n: usize,
    x: &[f64],
    incx: usize,
    y: &[f64],
    incy: usize,
) -> Result<f64, DotError> {
    if incx == 0 || incy == 0 {
        return Err(DotError::ZeroStride);
    }
    for (len, inc) in [(x.len(), incx), (y.len(), incy)] {
        // A length past usize::MAX can never be satisfied
        let required = strided_len(n, inc).unwrap_or(usize::MAX);
        if len < required {
            return Err(DotError::ShapeMismatch(required, len));
        }
    }
    Ok(ddot_strided(n, x, incx, y, incy))
}

// Minimum slice length holding `n` elements at stride `inc`, `None` on overflow
fn strided_len(n: usize, inc: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    (n - 1).checked_mul(inc).and_then(|v| v.checked_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reprodot_math::LIMBS;

    #[test]
    fn test_basic_dot() {
        assert_eq!(ddot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_empty_is_positive_zero() {
        assert_eq!(ddot(&[], &[]).to_bits(), 0);
        assert_eq!(DotAccumulator::new().finish().to_bits(), 0);
    }

    #[test]
    fn test_zero_operands_are_skipped() {
        let mut acc = DotAccumulator::new();
        acc.push(0.0, 7.0);
        acc.push(-0.0, f64::MAX);
        assert!(acc.positive().is_zero());
        assert!(acc.negative().is_zero());
        assert_eq!(acc.finish().to_bits(), 0);
    }

    #[test]
    fn test_signs_route_to_accumulators() {
        let mut acc = DotAccumulator::new();
        acc.push(-2.0, 3.0);
        assert!(acc.positive().is_zero());
        assert!(!acc.negative().is_zero());
        acc.push(-2.0, -3.0);
        assert_eq!(acc.positive(), acc.negative());
        assert_eq!(acc.finish().to_bits(), 0);
    }

    #[test]
    fn test_infinity_flags() {
        let mut acc = DotAccumulator::new();
        acc.push(f64::NEG_INFINITY, -1e-300);
        assert!(acc.flags().saw_pos_inf);
        assert_eq!(acc.finish(), f64::INFINITY);

        acc.push(5e-324, f64::NEG_INFINITY);
        assert!(acc.flags().saw_neg_inf);
        assert!(acc.finish().is_nan());
    }

    #[test]
    fn test_zero_times_infinity_is_invalid() {
        let mut acc = DotAccumulator::new();
        acc.push(f64::INFINITY, -0.0);
        assert!(acc.flags().saw_invalid_zero_inf);
        assert!(!acc.flags().saw_pos_inf && !acc.flags().saw_neg_inf);
        assert_eq!(acc.finish().to_bits(), ieee::CANONICAL_NAN_BITS);
    }

    #[test]
    fn test_nan_short_circuits_classification() {
        let mut acc = DotAccumulator::new();
        acc.push(f64::NAN, f64::INFINITY);
        assert!(acc.flags().saw_nan);
        assert!(!acc.flags().saw_pos_inf);
        assert_eq!(acc.finish().to_bits(), ieee::CANONICAL_NAN_BITS);
    }

    #[test]
    fn test_exact_cancellation_of_huge_terms() {
        // Naive summation loses the 1.0 entirely
        let x = [1e308, 1.0, -1e308];
        let y = [10.0, 1.0, 10.0];
        assert_eq!(ddot(&x, &y), 1.0);
    }

    #[test]
    fn test_finite_sum_overflows_to_infinity() {
        assert_eq!(ddot(&[f64::MAX, f64::MAX], &[1.0, 1.0]), f64::INFINITY);
        assert_eq!(ddot(&[f64::MAX], &[-2.0]), f64::NEG_INFINITY);
        assert_eq!(ddot(&[f64::MAX, f64::MAX, -f64::MAX], &[1.0, 1.0, 1.0]), f64::MAX);
    }

    #[test]
    fn test_saturated_accumulators_compare() {
        let mut acc = DotAccumulator::new();
        acc.flags.overflowed_accumulator = true;
        acc.pos = BigAccumulator::from_limbs([u64::MAX; LIMBS]);
        assert_eq!(acc.finish(), f64::INFINITY);

        acc.neg = acc.pos;
        assert_eq!(acc.finish().to_bits(), 0);

        acc.pos = BigAccumulator::new();
        assert_eq!(acc.finish(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_push_into_full_accumulator_saturates() {
        let mut acc = DotAccumulator::new();
        acc.pos = BigAccumulator::from_limbs([u64::MAX; LIMBS]);
        assert!(!acc.flags().overflowed_accumulator);

        acc.push(f64::MAX, f64::MAX);
        assert!(acc.flags().overflowed_accumulator);
        assert!(acc.positive().is_saturated());
        assert_eq!(acc.finish(), f64::INFINITY);

        // Still saturated, and still dominant over the other side
        acc.push(-1.0, 1.0);
        assert!(acc.positive().is_saturated());
        assert_eq!(acc.finish(), f64::INFINITY);
    }

    #[test]
    fn test_push_carry_off_top_limb_saturates() {
        // Every bit set except the one 1.0 · 1.0 lands on (2^0 sits at bit 2148)
        let mut limbs = [u64::MAX; LIMBS];
        limbs[33] = !(1 << 36);
        let mut acc = DotAccumulator::new();
        acc.neg = BigAccumulator::from_limbs(limbs);

        acc.push(-1.0, 1.0);
        assert!(!acc.flags().overflowed_accumulator);
        acc.push(-1.0, 1.0);
        assert!(acc.flags().overflowed_accumulator);
        assert!(acc.negative().is_saturated());
        assert_eq!(acc.finish(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_merge_of_near_full_states_saturates() {
        let mut top_half = [0u64; LIMBS];
        top_half[LIMBS - 1] = 1 << 63;

        let mut left: DotAccumulator = [(1.5, -2.0)].into_iter().collect();
        left.pos = BigAccumulator::from_limbs(top_half);
        let mut right: DotAccumulator = [(3.0, 4.0)].into_iter().collect();
        right.pos = BigAccumulator::from_limbs(top_half);
        assert!(!left.flags().overflowed_accumulator);
        assert!(!right.flags().overflowed_accumulator);

        left.merge(&right);
        assert!(left.flags().overflowed_accumulator);
        assert!(left.positive().is_saturated());
        assert!(!left.negative().is_saturated());
        assert_eq!(left.finish(), f64::INFINITY);

        let mut neg_left = DotAccumulator::new();
        neg_left.neg = BigAccumulator::from_limbs(top_half);
        let mut neg_right = DotAccumulator::new();
        neg_right.neg = BigAccumulator::from_limbs(top_half);
        neg_left.merge(&neg_right);
        assert!(neg_left.flags().overflowed_accumulator);
        assert_eq!(neg_left.finish(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_merge_of_both_saturated_sides_is_zero() {
        let full = BigAccumulator::from_limbs([u64::MAX; LIMBS]);
        let mut acc = DotAccumulator::new();
        acc.pos = full;
        let mut other: DotAccumulator = [(1.0, 1.0)].into_iter().collect();
        other.neg = full;

        acc.merge(&other);
        assert!(acc.flags().overflowed_accumulator);
        assert!(acc.positive().is_saturated());
        assert!(acc.negative().is_saturated());
        assert_eq!(acc.finish().to_bits(), 0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let x = [1.5, -2.25, 1e-310, 3e200, -3e200, 7.0];
        let y = [4.0, 8.0, 3.0, 1e-200, 1e-200, -0.125];

        let whole: DotAccumulator = x.iter().copied().zip(y.iter().copied()).collect();
        let mut left: DotAccumulator = x[..2].iter().copied().zip(y[..2].iter().copied()).collect();
        let right: DotAccumulator = x[2..].iter().copied().zip(y[2..].iter().copied()).collect();
        left.merge(&right);

        assert_eq!(left, whole);
        assert_eq!(left.finish().to_bits(), whole.finish().to_bits());
    }

    #[test]
    fn test_try_ddot_rejects_mismatch() {
        assert!(matches!(
            try_ddot(&[1.0, 2.0], &[1.0]),
            Err(DotError::ShapeMismatch(2, 1))
        ));
        assert_eq!(try_ddot(&[2.0], &[0.5]).unwrap(), 1.0);
    }

    #[test]
    fn test_strided() {
        let x = [1.0, 100.0, 2.0, 100.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        assert_eq!(ddot_strided(3, &x, 2, &y, 1), 32.0);
        assert_eq!(try_ddot_strided(3, &x, 2, &y, 1).unwrap(), 32.0);
        assert_eq!(ddot_strided(0, &x, 2, &y, 1).to_bits(), 0);

        assert!(matches!(try_ddot_strided(3, &x, 0, &y, 1), Err(DotError::ZeroStride)));
        assert!(matches!(
            try_ddot_strided(3, &x, 3, &y, 1),
            Err(DotError::ShapeMismatch(7, 5))
        ));
    }

    #[test]
    fn test_strided_length_overflow_is_rejected() {
        let x = [1.0, 2.0];
        let y = [1.0, 2.0];
        assert!(matches!(
            try_ddot_strided(usize::MAX, &x, 2, &y, 1),
            Err(DotError::ShapeMismatch(usize::MAX, 2))
        ));
        assert!(matches!(
            try_ddot_strided(usize::MAX / 2 + 2, &x, 1, &y, 2),
            Err(DotError::ShapeMismatch(_, 2))
        ));
        assert_eq!(strided_len(usize::MAX, 1), Some(usize::MAX));
        assert_eq!(strided_len(usize::MAX, 2), None);
    }
}
