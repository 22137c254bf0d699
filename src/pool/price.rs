use crate::error::{Error, MathError, SwapError};
use crate::math::math_helpers::{narrow_u512, widen_u256};
use crate::pool::token::{Token, TokenAmount};
use alloy_primitives::U512;

/// Exchange rate between two tokens as the fraction
/// `numerator / denominator` of raw quote units per raw base unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Price {
    pub base: Token,
    pub quote: Token,
    numerator: U512,
    denominator: U512,
}

impl Price {
    pub fn new(
        base: Token,
        quote: Token,
        numerator: U512,
        denominator: U512,
    ) -> Result<Self, MathError> {
        if denominator.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self {
            base,
            quote,
            numerator,
            denominator,
        })
    }

    #[inline]
    pub fn numerator(&self) -> U512 {
        self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> U512 {
        self.denominator
    }

    /// The same rate seen from the quote token.
    pub fn invert(&self) -> Result<Self, MathError> {
        Self::new(
            self.quote.clone(),
            self.base.clone(),
            self.denominator,
            self.numerator,
        )
    }

    /// Converts an amount of the base token into the quote token,
    /// rounding down.
    pub fn quote(&self, amount: &TokenAmount) -> Result<TokenAmount, Error> {
        if !amount.token.equals(&self.base) {
            return Err(SwapError::TokenNotInPool.into());
        }
        let raw = widen_u256(amount.raw())
            .checked_mul(self.numerator)
            .ok_or(MathError::Overflow)?
            / self.denominator;
        Ok(TokenAmount::new(self.quote.clone(), narrow_u512(raw)?))
    }

    /// Decimal-adjusted rate for display. Loses precision.
    pub fn to_f64(&self) -> f64 {
        let scale = 10f64.powi(self.base.decimals as i32 - self.quote.decimals as i32);
        u512_to_f64(self.numerator) / u512_to_f64(self.denominator) * scale
    }
}

fn u512_to_f64(x: U512) -> f64 {
    x.as_limbs()
        .iter()
        .rev()
        .fold(0f64, |acc, limb| acc * 18446744073709551616f64 + *limb as f64)
}
