//! Round-to-nearest-even conversion of an exact accumulator value to binary64.
//!
//! This is the only place where floating-point semantics are decided; its inputs
//! are exact integers.
//!
//! Correct rounding needs two facts beyond the kept bits:
//! * guard: the first bit below the cut
//! * sticky: whether anything below the guard is nonzero
//!
//! guard=0 → below half, truncate. guard=1, sticky=1 → above half, round up.
//! guard=1, sticky=0 → exact tie, round up only if the kept LSB is odd.

use std::cmp::Ordering;

use reprodot_math::ieee::{
    self, EXPONENT_BIAS, FRACTION_BITS, MAX_EXPONENT, MIN_NORMAL_EXPONENT, SUBNORMAL_EXPONENT,
};
use reprodot_math::{BigAccumulator, MIN_EXPONENT};

/// Bit index of the 2^-1074 slot
const SUBNORMAL_LSB: usize = (SUBNORMAL_EXPONENT - MIN_EXPONENT) as usize;

#[inline]
fn round_nearest_even(kept: u64, guard: bool, sticky: bool) -> u64 {
    if guard && (sticky || kept & 1 == 1) {
        kept + 1
    } else {
        kept
    }
}

/// Round `pos - neg` to the nearest double. Exact cancellation gives `+0.0`.
pub fn round_difference(pos: &BigAccumulator, neg: &BigAccumulator) -> f64 {
    let (negative, magnitude) = match pos.compare(neg) {
        Ordering::Equal => return ieee::zero(false),
        Ordering::Greater => (false, pos.subtract(neg)),
        Ordering::Less => (true, neg.subtract(pos)),
    };
    round_magnitude(negative, &magnitude)
}

/// Round a signed exact magnitude to the nearest double.
pub fn round_magnitude(negative: bool, magnitude: &BigAccumulator) -> f64 {
    let Some(msb) = magnitude.most_significant_bit() else {
        return ieee::zero(negative);
    };

    let mut exponent = MIN_EXPONENT + msb as i32;
    if exponent > MAX_EXPONENT {
        return ieee::infinity(negative);
    }

    if exponent < MIN_NORMAL_EXPONENT {
        // Fixed window: the 52 fraction bits sit on the 2^-1074 grid
        let fraction = magnitude.extract_bits(SUBNORMAL_LSB, FRACTION_BITS);
        let guard = magnitude.extract_bits(SUBNORMAL_LSB - 1, 1) == 1;
        let sticky = magnitude.any_bits_below(SUBNORMAL_LSB - 1);

        let fraction = round_nearest_even(fraction, guard, sticky);
        if fraction >> FRACTION_BITS != 0 {
            // Rounded up into the smallest normal
            return ieee::pack(negative, 1, 0);
        }
        return ieee::pack(negative, 0, fraction);
    }

    let cut = msb - FRACTION_BITS as usize;
    let significand = magnitude.extract_bits(cut, FRACTION_BITS + 1);
    let guard = magnitude.extract_bits(cut - 1, 1) == 1;
    let sticky = magnitude.any_bits_below(cut - 1);

    let mut significand = round_nearest_even(significand, guard, sticky);
    if significand >> (FRACTION_BITS + 1) != 0 {
        significand = 0;
        exponent += 1;
        if exponent > MAX_EXPONENT {
            return ieee::infinity(negative);
        }
    }

    ieee::pack(negative, (exponent + EXPONENT_BIAS) as u64, significand)
}
