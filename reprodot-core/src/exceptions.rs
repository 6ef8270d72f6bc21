/// IEEE exceptional conditions seen while accumulating.
///
/// Flags are set-once: the loop only ever raises them, and merging two
/// partial states ORs them, so the outcome does not depend on term order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionFlags {
    pub saw_nan: bool,
    /// 0 × ∞ in either order
    pub saw_invalid_zero_inf: bool,
    pub saw_pos_inf: bool,
    pub saw_neg_inf: bool,
    /// A finite partial sum ran off the top of its accumulator
    pub overflowed_accumulator: bool,
}

/// What the flags decide about the final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical quiet NaN
    Invalid,
    Infinite { negative: bool },
    /// Finite sum saturated: the larger accumulator picks the infinity
    Saturated,
    /// No exceptional condition; round the exact sum
    Finite,
}

impl ExceptionFlags {
    pub fn merge(&mut self, other: &Self) {
        self.saw_nan |= other.saw_nan;
        self.saw_invalid_zero_inf |= other.saw_invalid_zero_inf;
        self.saw_pos_inf |= other.saw_pos_inf;
        self.saw_neg_inf |= other.saw_neg_inf;
        self.overflowed_accumulator |= other.overflowed_accumulator;
    }

    /// Strict resolution order: invalid, then infinities, then saturation.
    pub fn resolve(&self) -> Resolution {
        if self.saw_nan || self.saw_invalid_zero_inf {
            return Resolution::Invalid;
        }
        match (self.saw_pos_inf, self.saw_neg_inf) {
            (true, true) => Resolution::Invalid,
            (true, false) => Resolution::Infinite { negative: false },
            (false, true) => Resolution::Infinite { negative: true },
            (false, false) if self.overflowed_accumulator => Resolution::Saturated,
            (false, false) => Resolution::Finite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_flags_are_finite() {
        assert_eq!(ExceptionFlags::default().resolve(), Resolution::Finite);
    }

    #[test]
    fn test_nan_outranks_everything() {
        let flags = ExceptionFlags {
            saw_nan: true,
            saw_pos_inf: true,
            overflowed_accumulator: true,
            ..Default::default()
        };
        assert_eq!(flags.resolve(), Resolution::Invalid);

        let flags = ExceptionFlags { saw_invalid_zero_inf: true, saw_neg_inf: true, ..Default::default() };
        assert_eq!(flags.resolve(), Resolution::Invalid);
    }

    #[test]
    fn test_infinities() {
        let pos = ExceptionFlags { saw_pos_inf: true, overflowed_accumulator: true, ..Default::default() };
        assert_eq!(pos.resolve(), Resolution::Infinite { negative: false });

        let neg = ExceptionFlags { saw_neg_inf: true, ..Default::default() };
        assert_eq!(neg.resolve(), Resolution::Infinite { negative: true });

        let mut both = pos;
        both.merge(&neg);
        assert_eq!(both.resolve(), Resolution::Invalid);
    }

    #[test]
    fn test_saturation() {
        let flags = ExceptionFlags { overflowed_accumulator: true, ..Default::default() };
        assert_eq!(flags.resolve(), Resolution::Saturated);
    }
}
