use crate::error::{Error, MathError, SwapError};
use crate::math::liquidity_math::add_delta;
use crate::math::math_helpers::unlikely;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
use crate::U256_1;
use alloy_primitives::{I256, U256};
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Swap direction: `true` for token0 → token1, `false` for token1 → token0.
    pub zero_for_one: bool,
    /// Signed amount being swapped. Positive means “exact in”, negative means “exact out”.
    pub amount_specified: I256,
    /// Sqrt‑price limit in Q96 that bounds how far the price is allowed to move.
    ///
    /// `None` lets the swap run to one unit inside the global price bounds.
    pub sqrt_price_limit_x96: Option<U256>,
}

impl SwapParams {
    #[inline]
    pub fn new(
        zero_for_one: bool,
        amount_specified: I256,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Self {
        Self {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        }
    }

    /// Pay exactly `amount_in` of the input token.
    pub fn exact_input(zero_for_one: bool, amount_in: U256) -> Result<Self, SwapError> {
        let amount = I256::try_from(amount_in).map_err(|_| SwapError::AmountTooLarge)?;
        Ok(Self::new(zero_for_one, amount, None))
    }

    /// Receive exactly `amount_out` of the output token.
    pub fn exact_output(zero_for_one: bool, amount_out: U256) -> Result<Self, SwapError> {
        let amount = I256::try_from(amount_out).map_err(|_| SwapError::AmountTooLarge)?;
        Ok(Self::new(zero_for_one, -amount, None))
    }

    #[inline]
    pub fn with_price_limit(mut self, sqrt_price_limit_x96: U256) -> Self {
        self.sqrt_price_limit_x96 = Some(sqrt_price_limit_x96);
        self
    }

    /// The explicit limit, or the default one unit inside the global bounds.
    #[inline]
    pub fn effective_price_limit(&self) -> U256 {
        self.sqrt_price_limit_x96.unwrap_or(if self.zero_for_one {
            MIN_SQRT_RATIO + U256_1
        } else {
            MAX_SQRT_RATIO - U256_1
        })
    }
}

/// Result of a simulated swap.
///
/// `amount0` / `amount1` follow the pool contract's sign convention:
/// positive amounts are paid into the pool, negative amounts leave it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount0: I256,
    pub amount1: I256,
    /// Input-token fees charged across all steps.
    pub fees_paid: U256,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick: i32,
    /// Initialized ticks whose liquidity was applied.
    pub ticks_crossed: u32,
}

/// The loop state of one swap; the results become the new pool snapshot.
#[derive(Debug)]
pub(crate) struct SwapState {
    zero_for_one: bool,
    exact_input: bool,
    fee_pips: u32,
    sqrt_price_limit_x96: U256,
    amount_specified: I256,
    // the amount remaining to be swapped in/out of the input/output asset
    amount_specified_remaining: I256,
    // the amount already swapped out/in of the output/input asset
    amount_calculated: I256,
    sqrt_price_x96: U256,
    // the tick associated with the current price
    tick: i32,
    // the current liquidity in range
    liquidity: u128,
    fees_paid: U256,
    ticks_crossed: u32,
}

impl SwapState {
    /// Validates the price limit against the starting price and direction.
    pub(crate) fn new(
        params: &SwapParams,
        sqrt_price_x96: U256,
        tick: i32,
        liquidity: u128,
        fee_pips: u32,
    ) -> Result<Self, SwapError> {
        let zero_for_one = params.zero_for_one;
        let sqrt_price_limit_x96 = params.effective_price_limit();

        if unlikely(sqrt_price_limit_x96 <= MIN_SQRT_RATIO || sqrt_price_limit_x96 >= MAX_SQRT_RATIO)
        {
            return Err(SwapError::PriceLimitOutOfBounds);
        }
        let wrong_side = if zero_for_one {
            sqrt_price_limit_x96 >= sqrt_price_x96
        } else {
            sqrt_price_limit_x96 <= sqrt_price_x96
        };
        if unlikely(wrong_side) {
            return Err(SwapError::PriceLimitWrongSide);
        }

        Ok(Self {
            zero_for_one,
            exact_input: !params.amount_specified.is_negative(),
            fee_pips,
            sqrt_price_limit_x96,
            amount_specified: params.amount_specified,
            amount_specified_remaining: params.amount_specified,
            amount_calculated: I256::ZERO,
            sqrt_price_x96,
            tick,
            liquidity,
            fees_paid: U256::ZERO,
            ticks_crossed: 0,
        })
    }

    #[inline]
    pub(crate) fn zero_for_one(&self) -> bool {
        self.zero_for_one
    }

    #[inline]
    pub(crate) fn tick(&self) -> i32 {
        self.tick
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.amount_specified_remaining.is_zero() || self.sqrt_price_x96 == self.sqrt_price_limit_x96
    }

    /// Swaps up to `tick_next` (or the price limit, whichever is closer).
    ///
    /// Returns `Some(tick)` when the step ended exactly on an initialized
    /// tick; the caller must then look up its `liquidity_net` and call
    /// [`SwapState::cross`].
    pub(crate) fn step(&mut self, tick_next: i32, initialized: bool) -> Result<Option<i32>, Error> {
        let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_start_x96 = self.sqrt_price_x96;
        let sqrt_price_next_x96 = get_sqrt_ratio_at_tick(tick_next)?;

        let target = if self.zero_for_one {
            sqrt_price_next_x96.max(self.sqrt_price_limit_x96)
        } else {
            sqrt_price_next_x96.min(self.sqrt_price_limit_x96)
        };

        let (sqrt_price_x96, amount_in, amount_out, fee_amount) = compute_swap_step(
            sqrt_price_start_x96,
            target,
            self.liquidity,
            self.amount_specified_remaining,
            self.fee_pips,
        )?;
        self.sqrt_price_x96 = sqrt_price_x96;
        self.fees_paid = self.fees_paid.saturating_add(fee_amount);

        let paid = to_signed(amount_in + fee_amount)?;
        let received = to_signed(amount_out)?;
        if self.exact_input {
            self.amount_specified_remaining = checked_sub(self.amount_specified_remaining, paid)?;
            self.amount_calculated = checked_sub(self.amount_calculated, received)?;
        } else {
            self.amount_specified_remaining = checked_add(self.amount_specified_remaining, received)?;
            self.amount_calculated = checked_add(self.amount_calculated, paid)?;
        }

        trace!(
            tick = self.tick,
            tick_next,
            initialized,
            sqrt_price_x96 = %self.sqrt_price_x96,
            amount_in = %amount_in,
            amount_out = %amount_out,
            fee_amount = %fee_amount,
            liquidity = self.liquidity,
            "swap step"
        );

        if self.sqrt_price_x96 == sqrt_price_next_x96 {
            if initialized {
                return Ok(Some(tick_next));
            }
            self.tick = self.tick_after_crossing(tick_next);
        } else if self.sqrt_price_x96 != sqrt_price_start_x96 {
            // a step that did not move keeps the tick chosen by the last crossing
            self.tick = get_tick_at_sqrt_ratio(self.sqrt_price_x96)?;
        }
        Ok(None)
    }

    /// Applies the net liquidity of the initialized `tick` just reached,
    /// negated when moving down in price.
    pub(crate) fn cross(&mut self, tick: i32, liquidity_net: i128) -> Result<(), Error> {
        let delta = if self.zero_for_one {
            liquidity_net.checked_neg().ok_or(MathError::Overflow)?
        } else {
            liquidity_net
        };
        self.liquidity = add_delta(self.liquidity, delta)?;
        self.tick = self.tick_after_crossing(tick);
        self.ticks_crossed += 1;

        debug!(
            tick,
            liquidity_net,
            liquidity = self.liquidity,
            "crossed initialized tick"
        );
        Ok(())
    }

    pub(crate) fn finish(self) -> SwapOutcome {
        let consumed = self.amount_specified - self.amount_specified_remaining;
        let (amount0, amount1) = if self.zero_for_one == self.exact_input {
            (consumed, self.amount_calculated)
        } else {
            (self.amount_calculated, consumed)
        };

        debug!(
            zero_for_one = self.zero_for_one,
            amount0 = %amount0,
            amount1 = %amount1,
            tick = self.tick,
            ticks_crossed = self.ticks_crossed,
            "swap complete"
        );

        SwapOutcome {
            amount0,
            amount1,
            fees_paid: self.fees_paid,
            sqrt_price_x96: self.sqrt_price_x96,
            liquidity: self.liquidity,
            tick: self.tick,
            ticks_crossed: self.ticks_crossed,
        }
    }

    #[inline]
    fn tick_after_crossing(&self, tick: i32) -> i32 {
        if self.zero_for_one { tick - 1 } else { tick }
    }
}

#[inline]
fn to_signed(x: U256) -> Result<I256, MathError> {
    I256::try_from(x).map_err(|_| MathError::Overflow)
}

#[inline]
fn checked_add(a: I256, b: I256) -> Result<I256, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

#[inline]
fn checked_sub(a: I256, b: I256) -> Result<I256, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}
