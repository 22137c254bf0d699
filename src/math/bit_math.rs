use crate::error::MathError;
use alloy_primitives::U256;

/// Upper bounds checked by the range tests, from the widest half down.
const MSB_STEPS: [(U256, usize); 8] = [
    (U256::from_limbs([u64::MAX, u64::MAX, 0, 0]), 128),
    (U256::from_limbs([u64::MAX, 0, 0, 0]), 64),
    (U256::from_limbs([u32::MAX as u64, 0, 0, 0]), 32),
    (U256::from_limbs([u16::MAX as u64, 0, 0, 0]), 16),
    (U256::from_limbs([u8::MAX as u64, 0, 0, 0]), 8),
    (U256::from_limbs([0xf, 0, 0, 0]), 4),
    (U256::from_limbs([0x3, 0, 0, 0]), 2),
    (U256::from_limbs([0x1, 0, 0, 0]), 1),
];

/// Returns the index (0–255) of the most significant set bit in a `U256`,
/// or `MathError::ZeroValue` if the input is zero.
///
/// Runs a fixed sequence of power‑of‑two range tests (128, 64, …, 1) and
/// shifts the value down after each hit, so the cost does not depend on
/// the position of the highest bit. `U256` cannot exceed `2^256 - 1`, so
/// the upper precondition is enforced by the type.
pub fn most_significant_bit(x: U256) -> Result<u8, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }

    let mut r = x;
    let mut msb = 0usize;
    for (bound, shift) in MSB_STEPS {
        if r > bound {
            r >>= shift;
            msb += shift;
        }
    }
    Ok(msb as u8)
}

/// Returns the index (0–255) of the least significant set bit in a `U256`,
/// or `MathError::ZeroValue` if the input is zero.
///
/// Used when scanning bitmap words from the right.
pub fn least_significant_bit(x: U256) -> Result<u8, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(x.trailing_zeros() as u8)
}
