//! IEEE-754 binary64 field layout, decoding and packing.
//!
//! All conversions go through `f64::to_bits` / `f64::from_bits`; nothing in this
//! module performs floating-point arithmetic.

/// Stored fraction width (explicit mantissa bits)
pub const FRACTION_BITS: u32 = 52;
pub const FRACTION_MASK: u64 = (1 << FRACTION_BITS) - 1;
pub const HIDDEN_BIT: u64 = 1 << FRACTION_BITS;
pub const SIGN_MASK: u64 = 1 << 63;
/// Biased exponent field, after shifting out the fraction
pub const EXPONENT_FIELD_MASK: u64 = 0x7FF;
pub const EXPONENT_BIAS: i32 = 1023;

/// Unbiased exponent range of normal numbers
pub const MIN_NORMAL_EXPONENT: i32 = 1 - EXPONENT_BIAS;
pub const MAX_EXPONENT: i32 = EXPONENT_BIAS;

/// Exponent of the subnormal LSB (2^-1074), i.e. `E` of every subnormal term
pub const SUBNORMAL_EXPONENT: i32 = MIN_NORMAL_EXPONENT - FRACTION_BITS as i32;
/// Largest `E` a finite term can carry (biased 0x7FE)
pub const MAX_TERM_EXPONENT: i32 = MAX_EXPONENT - FRACTION_BITS as i32;

/// Default quiet NaN: exponent all ones, only the quiet bit set
pub const CANONICAL_NAN_BITS: u64 = 0x7FF8_0000_0000_0000;

/// A finite nonzero binary64 value as `(-1)^negative · significand · 2^exponent`.
///
/// `significand` is at most 53 bits wide. The representation is exact for every
/// finite nonzero double, the smallest subnormal included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub negative: bool,
    pub significand: u64,
    pub exponent: i32,
}

/// Exact product of two [`Term`]s; `significand` is at most 106 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub negative: bool,
    pub significand: u128,
    pub exponent: i32,
}

/// Classification of a binary64 bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Nan,
    Infinite { negative: bool },
    Zero { negative: bool },
    Subnormal(Term),
    Normal(Term),
}

impl Term {
    /// Exact product; never rounds.
    #[inline]
    pub fn product(self, other: Term) -> Product {
        Product {
            negative: self.negative ^ other.negative,
            significand: self.significand as u128 * other.significand as u128,
            exponent: self.exponent + other.exponent,
        }
    }
}

impl Decoded {
    /// Decode a raw binary64 bit pattern.
    pub fn from_bits(bits: u64) -> Self {
        let negative = bits & SIGN_MASK != 0;
        let biased = (bits >> FRACTION_BITS) & EXPONENT_FIELD_MASK;
        let fraction = bits & FRACTION_MASK;

        match (biased, fraction) {
            (EXPONENT_FIELD_MASK, 0) => Decoded::Infinite { negative },
            (EXPONENT_FIELD_MASK, _) => Decoded::Nan,
            (0, 0) => Decoded::Zero { negative },
            (0, _) => Decoded::Subnormal(Term {
                negative,
                significand: fraction,
                exponent: SUBNORMAL_EXPONENT,
            }),
            _ => Decoded::Normal(Term {
                negative,
                significand: fraction | HIDDEN_BIT,
                exponent: biased as i32 - EXPONENT_BIAS - FRACTION_BITS as i32,
            }),
        }
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self::from_bits(value.to_bits())
    }

    /// The finite nonzero term, if any.
    #[inline]
    pub fn term(&self) -> Option<Term> {
        match *self {
            Decoded::Subnormal(term) | Decoded::Normal(term) => Some(term),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self, Decoded::Nan)
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, Decoded::Infinite { .. })
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Decoded::Zero { .. })
    }

    /// Sign bit of everything except NaN (which reports `false`).
    #[inline]
    pub fn is_negative(&self) -> bool {
        match *self {
            Decoded::Nan => false,
            Decoded::Infinite { negative } | Decoded::Zero { negative } => negative,
            Decoded::Subnormal(term) | Decoded::Normal(term) => term.negative,
        }
    }
}

/// Assemble a binary64 from its three fields. `fraction` is masked to 52 bits.
#[inline]
pub fn pack(negative: bool, biased_exponent: u64, fraction: u64) -> f64 {
    let sign = if negative { SIGN_MASK } else { 0 };
    f64::from_bits(
        sign | ((biased_exponent & EXPONENT_FIELD_MASK) << FRACTION_BITS) | (fraction & FRACTION_MASK),
    )
}

#[inline]
pub fn infinity(negative: bool) -> f64 {
    pack(negative, EXPONENT_FIELD_MASK, 0)
}

#[inline]
pub fn zero(negative: bool) -> f64 {
    pack(negative, 0, 0)
}

#[inline]
pub fn quiet_nan() -> f64 {
    f64::from_bits(CANONICAL_NAN_BITS)
}
