//! Scalar types a typed argument run can be read as

use crate::format::ArgumentType;

/// Trait for scalar values stored directly in argument slots
///
/// Implementors decode a raw 64-bit slot without consulting the string blob
/// or the descriptor table.
pub trait ScalarAtom: Copy + PartialEq + Sized {
    /// Argument type whose slots hold this scalar
    fn argument_type() -> ArgumentType;

    /// Decode from the raw little-endian slot value
    fn from_slot(bits: u64) -> Self;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;
}

impl ScalarAtom for i64 {
    fn argument_type() -> ArgumentType {
        ArgumentType::Long
    }

    fn from_slot(bits: u64) -> Self {
        bits as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ScalarAtom for f64 {
    fn argument_type() -> ArgumentType {
        ArgumentType::Double
    }

    // Bit reinterpretation, not a numeric conversion
    fn from_slot(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn to_f64(self) -> f64 {
        self
    }
}
