use crate::error::MathError;
use alloy_primitives::{U256, U512};

const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

#[cold]
#[inline(never)]
const fn cold_path() {}

/// Branch hint for the common case.
#[inline(always)]
pub(crate) const fn likely(b: bool) -> bool {
    if !b {
        cold_path();
    }
    b
}

/// Branch hint for error and edge paths.
#[inline(always)]
pub(crate) const fn unlikely(b: bool) -> bool {
    if b {
        cold_path();
    }
    b
}

/// Computes `floor(a * b / denominator)` with full 512‑bit intermediate
/// precision, returning a `MathError` on overflow or division by zero.
///
/// The 512‑bit product is held as two 256‑bit halves `(prod1, prod0)`
/// recovered from a wrapping multiply and a `mulmod` by `2^256 - 1`; the
/// division is then done by multiplying with the modular inverse of the
/// odd part of the denominator, which is exact whenever the quotient fits
/// in 256 bits.
#[inline(always)]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if unlikely(denominator.is_zero()) {
        return Err(MathError::DivisionByZero);
    }

    let mut prod0 = a.wrapping_mul(b);
    let mm = a.mul_mod(b, U256::MAX);
    let mut prod1 = mm
        .wrapping_sub(prod0)
        .wrapping_sub(U256::from((mm < prod0) as u8));

    if likely(prod1.is_zero()) {
        return Ok(prod0 / denominator);
    }

    if unlikely(denominator <= prod1) {
        return Err(MathError::Overflow);
    }

    // make the 512-bit numerator an exact multiple of the denominator
    let remainder = a.mul_mod(b, denominator);
    prod1 = prod1.wrapping_sub(U256::from((remainder > prod0) as u8));
    prod0 = prod0.wrapping_sub(remainder);

    // factor out powers of two, folding the high half into prod0
    let twos = denominator & denominator.wrapping_neg();
    let odd_denominator = denominator / twos;
    prod0 /= twos;
    let flip = twos.wrapping_neg() / twos + U256::ONE;
    prod0 |= prod1.wrapping_mul(flip);

    // Newton-Raphson inverse mod 2^256, each round doubles the correct bits
    let mut inv = U256_THREE.wrapping_mul(odd_denominator) ^ U256_TWO;
    for _ in 0..6 {
        inv = inv.wrapping_mul(U256_TWO.wrapping_sub(odd_denominator.wrapping_mul(inv)));
    }

    Ok(prod0.wrapping_mul(inv))
}

/// `ceil(a * b / denominator)` with the same 512‑bit guarantees as
/// [`mul_div`]. Fails on a zero denominator or when the rounded result
/// would exceed `U256::MAX`.
#[inline(always)]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator).is_zero() {
        return Ok(result);
    }
    result.checked_add(U256::ONE).ok_or(MathError::Overflow)
}

/// `ceil(a / b)`.
#[inline(always)]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if unlikely(b.is_zero()) {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

/// Narrows a `U512` to `U256`, failing with `MathError::Overflow` when
/// any of the upper four limbs is set.
#[inline]
pub fn narrow_u512(x: U512) -> Result<U256, MathError> {
    let limbs = x.as_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return Err(MathError::Overflow);
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Widens a `U256` into the low limbs of a `U512`.
#[inline]
pub fn widen_u256(x: U256) -> U512 {
    let l = x.as_limbs();
    U512::from_limbs([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
}

/// Integer square root (floor) by Newton's method.
pub fn sqrt_u512(value: U512) -> U512 {
    if value < U512::from(2u8) {
        return value;
    }
    // initial guess above the root: 2^ceil(bits / 2)
    let mut x = U512::ONE << value.bit_len().div_ceil(2);
    loop {
        let y = (x + value / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}
