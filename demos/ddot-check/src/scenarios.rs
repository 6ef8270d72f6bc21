use reprodot_core::ddot;
use sha2::{Digest, Sha256};

const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;
const TINY: f64 = 5e-324;

/// A literal input pair and the bit pattern `ddot` must produce for it.
pub struct Scenario {
    pub name: &'static str,
    pub x: &'static [f64],
    pub y: &'static [f64],
    pub expected_bits: u64,
}

impl Scenario {
    pub fn run(&self) -> u64 {
        ddot(self.x, self.y).to_bits()
    }
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "basic",
        x: &[1.0, 2.0, 3.0],
        y: &[4.0, 5.0, 6.0],
        expected_bits: 0x4040_0000_0000_0000,
    },
    Scenario {
        name: "order-forward",
        x: &[1e308, 1e-308, 3.0, 5.0, 1e-308],
        y: &[1e-308, 1e308, -3.0, 2.0, -1e-308],
        expected_bits: 0x4008_0000_0000_0000,
    },
    Scenario {
        name: "order-shuffled",
        x: &[1e-308, 5.0, 1e308, 3.0, 1e-308],
        y: &[-1e-308, 2.0, 1e-308, -3.0, 1e308],
        expected_bits: 0x4008_0000_0000_0000,
    },
    Scenario {
        name: "absorption",
        x: &[1e16, 1.0, -1e16],
        y: &[1.0, 1.0, 1.0],
        expected_bits: 0x3FF0_0000_0000_0000,
    },
    Scenario {
        name: "nan-propagation",
        x: &[1.0, f64::NAN, 3.0],
        y: &[1.0, 1.0, 1.0],
        expected_bits: CANONICAL_NAN,
    },
    Scenario {
        name: "zero-times-infinity",
        x: &[0.0],
        y: &[f64::INFINITY],
        expected_bits: CANONICAL_NAN,
    },
    Scenario {
        name: "infinity-cancellation",
        x: &[f64::INFINITY, f64::NEG_INFINITY],
        y: &[2.0, 2.0],
        expected_bits: CANONICAL_NAN,
    },
    Scenario {
        name: "positive-infinity",
        x: &[f64::INFINITY],
        y: &[1.0],
        expected_bits: 0x7FF0_0000_0000_0000,
    },
    Scenario {
        name: "negative-infinity",
        x: &[f64::NEG_INFINITY],
        y: &[1.0],
        expected_bits: 0xFFF0_0000_0000_0000,
    },
    Scenario {
        name: "subnormal-sum",
        x: &[TINY, TINY, TINY, TINY],
        y: &[1.0, 1.0, 1.0, 1.0],
        expected_bits: 0x0000_0000_0000_0004,
    },
    Scenario {
        name: "empty",
        x: &[],
        y: &[],
        expected_bits: 0,
    },
    Scenario {
        name: "overflow",
        x: &[f64::MAX, f64::MAX],
        y: &[1.0, 1.0],
        expected_bits: 0x7FF0_0000_0000_0000,
    },
];

/// SHA-256 over the little-endian result bits of every scenario, in table order.
pub fn fingerprint<I: IntoIterator<Item = u64>>(results: I) -> String {
    let mut hasher = Sha256::new();
    for bits in results {
        hasher.update(bits.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
