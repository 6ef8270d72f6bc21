use core::cmp::Ordering;

use crate::ieee::{MAX_TERM_EXPONENT, SUBNORMAL_EXPONENT};

/// Binary fixed-point accumulator sized for every binary64 product.
///
/// Bit `i` has weight `2^(MIN_EXPONENT + i)`.
/// Exponent floor: smallest possible product exponent (2^-1074 · 2^-1074)
/// Exponent ceiling: largest possible product exponent (ulp(MAX)²)
/// Significand: 106 bits (53 × 53)
/// Headroom: LIMBS·64 − SPAN_BITS spare top bits (2^28 maximal products before saturation)
pub const MIN_EXPONENT: i32 = 2 * SUBNORMAL_EXPONENT;
pub const MAX_PRODUCT_EXPONENT: i32 = 2 * MAX_TERM_EXPONENT;
pub const PRODUCT_SIGNIFICAND_BITS: usize = 106;
pub const SPAN_BITS: usize =
    (MAX_PRODUCT_EXPONENT - MIN_EXPONENT + 1) as usize + PRODUCT_SIGNIFICAND_BITS;
pub const LIMB_BITS: usize = u64::BITS as usize;
pub const LIMBS: usize = SPAN_BITS.div_ceil(LIMB_BITS);

const _: () = assert!(SPAN_BITS == 4197);
const _: () = assert!(LIMBS == 66);
// Rounding reads a guard bit one position below the 2^-1074 slot.
const _: () = assert!(MIN_EXPONENT < SUBNORMAL_EXPONENT - 1);

/// A carry ran off the top limb. The accumulator has been saturated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorOverflow;

/// Fixed-width unsigned integer, little-endian `u64` limbs, stack allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BigAccumulator {
    limbs: [u64; LIMBS],
}

impl Default for BigAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BigAccumulator {
    /// Create a zeroed accumulator
    pub const fn new() -> Self {
        Self { limbs: [0; LIMBS] }
    }

    pub fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        Self { limbs }
    }

    pub fn limbs(&self) -> &[u64; LIMBS] {
        &self.limbs
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    /// All bits set. A saturated accumulator stays saturated under further adds.
    pub fn is_saturated(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == u64::MAX)
    }

    fn saturate(&mut self) -> Result<(), AccumulatorOverflow> {
        self.limbs = [u64::MAX; LIMBS];
        Err(AccumulatorOverflow)
    }

    /// `self += value · 2^bit_shift`.
    ///
    /// `value` may use all 128 bits, so it lands in at most three limbs before the
    /// carry ripple. Bits or carries beyond the top limb saturate the accumulator
    /// and return [`AccumulatorOverflow`].
    pub fn add_shifted(&mut self, value: u128, bit_shift: usize) -> Result<(), AccumulatorOverflow> {
        if value == 0 {
            return Ok(());
        }

        let base = bit_shift / LIMB_BITS;
        let offset = (bit_shift % LIMB_BITS) as u32;
        let words = [
            (value << offset) as u64,
            (value >> (LIMB_BITS as u32 - offset)) as u64,
            if offset == 0 { 0 } else { (value >> (2 * LIMB_BITS as u32 - offset)) as u64 },
        ];

        let mut carry = false;
        for (i, &word) in words.iter().enumerate() {
            let idx = base + i;
            if idx >= LIMBS {
                if word != 0 || carry {
                    return self.saturate();
                }
                continue;
            }
            let (sum, c1) = self.limbs[idx].overflowing_add(word);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            self.limbs[idx] = sum;
            carry = c1 | c2;
        }

        let mut idx = base + words.len();
        while carry {
            if idx >= LIMBS {
                return self.saturate();
            }
            let (sum, c) = self.limbs[idx].overflowing_add(1);
            self.limbs[idx] = sum;
            carry = c;
            idx += 1;
        }
        Ok(())
    }

    /// `self += other` over the full width. Used to merge partial accumulators.
    pub fn add_assign(&mut self, other: &Self) -> Result<(), AccumulatorOverflow> {
        let mut carry = false;
        for (limb, &rhs) in self.limbs.iter_mut().zip(other.limbs.iter()) {
            let (sum, c1) = limb.overflowing_add(rhs);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            *limb = sum;
            carry = c1 | c2;
        }
        if carry {
            return self.saturate();
        }
        Ok(())
    }

    /// Limb-wise comparison from the most significant limb down.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.limbs.iter().rev().cmp(other.limbs.iter().rev())
    }

    /// `self - other`. Requires `self >= other`.
    pub fn subtract(&self, other: &Self) -> Self {
        debug_assert!(self.compare(other) != Ordering::Less, "subtract underflow");

        let mut out = [0u64; LIMBS];
        let mut borrow = false;
        for (i, slot) in out.iter_mut().enumerate() {
            let (diff, b1) = self.limbs[i].overflowing_sub(other.limbs[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            *slot = diff;
            borrow = b1 | b2;
        }
        Self { limbs: out }
    }

    /// Absolute index of the highest set bit, `None` for zero.
    pub fn most_significant_bit(&self) -> Option<usize> {
        self.limbs
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &limb)| limb != 0)
            .map(|(i, &limb)| i * LIMB_BITS + (LIMB_BITS - 1 - limb.leading_zeros() as usize))
    }

    /// Read `count` (≤ 64) bits starting at absolute bit `start`, straddling limbs
    /// as needed. Bits past the top of the accumulator read as zero.
    pub fn extract_bits(&self, start: usize, count: u32) -> u64 {
        debug_assert!(count <= u64::BITS);
        if count == 0 {
            return 0;
        }

        let base = start / LIMB_BITS;
        let offset = (start % LIMB_BITS) as u32;
        let window = self.limb_or_zero(base) as u128 | (self.limb_or_zero(base + 1) as u128) << LIMB_BITS;
        let bits = (window >> offset) as u64;

        if count == u64::BITS {
            bits
        } else {
            bits & ((1u64 << count) - 1)
        }
    }

    /// True if any bit strictly below absolute index `index` is set (sticky bit).
    pub fn any_bits_below(&self, index: usize) -> bool {
        let base = index / LIMB_BITS;
        let offset = index % LIMB_BITS;

        if self.limbs[..base.min(LIMBS)].iter().any(|&limb| limb != 0) {
            return true;
        }
        offset != 0 && base < LIMBS && self.limbs[base] & ((1u64 << offset) - 1) != 0
    }

    #[inline]
    fn limb_or_zero(&self, idx: usize) -> u64 {
        self.limbs.get(idx).copied().unwrap_or(0)
    }
}

impl PartialOrd for BigAccumulator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigAccumulator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}
