use crate::error::{Error, MathError, PoolError, SwapError};
use crate::math::math_helpers::widen_u256;
use crate::math::tick_bitmap::check_tick_spacing;
use crate::math::tick_math::{MAX_SQRT_RATIO, MAX_TICK, get_sqrt_ratio_at_tick};
use crate::pool::address::compute_pool_address;
use crate::pool::fee::FeeAmount;
use crate::pool::price::Price;
use crate::pool::swap::{SwapOutcome, SwapParams, SwapState};
use crate::pool::token::{Token, TokenAmount};
use crate::tick::{
    AsyncTickDataProvider, NoTickDataProvider, Tick, TickDataProvider, TickListDataProvider,
};
use crate::{ONE_IN_PIPS, Q192};
use alloy_primitives::{Address, B256, U256};
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of a concentrated-liquidity pool.
///
/// Quoting never mutates the snapshot; it returns the realized amount
/// together with a new `Pool` holding the post-trade price, tick and
/// liquidity. The tick data provider is shared between snapshots.
pub struct Pool<P = NoTickDataProvider> {
    token0: Token,
    token1: Token,
    fee: u32,
    sqrt_ratio_x96: U256,
    liquidity: u128,
    tick_current: i32,
    tick_spacing: i32,
    tick_data_provider: Arc<P>,
}

impl<P> Clone for Pool<P> {
    fn clone(&self) -> Self {
        Self {
            token0: self.token0.clone(),
            token1: self.token1.clone(),
            fee: self.fee,
            sqrt_ratio_x96: self.sqrt_ratio_x96,
            liquidity: self.liquidity,
            tick_current: self.tick_current,
            tick_spacing: self.tick_spacing,
            tick_data_provider: Arc::clone(&self.tick_data_provider),
        }
    }
}

impl<P> fmt::Debug for Pool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("token0", &self.token0)
            .field("token1", &self.token1)
            .field("fee", &self.fee)
            .field("sqrt_ratio_x96", &self.sqrt_ratio_x96)
            .field("liquidity", &self.liquidity)
            .field("tick_current", &self.tick_current)
            .field("tick_spacing", &self.tick_spacing)
            .finish_non_exhaustive()
    }
}

/// Tick spacing of a standard fee tier, rejecting fees of 100% or more first.
fn tier_tick_spacing(fee: u32) -> Result<i32, PoolError> {
    if fee >= ONE_IN_PIPS {
        return Err(PoolError::InvalidFee(fee));
    }
    Ok(FeeAmount::try_from(fee)?.tick_spacing())
}

impl<P> Pool<P> {
    /// Builds a snapshot for a standard fee tier from observed chain state.
    /// The tokens may be passed in either order.
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: u32,
        sqrt_ratio_x96: U256,
        liquidity: u128,
        tick_current: i32,
        tick_data_provider: Arc<P>,
    ) -> Result<Self, Error> {
        let tick_spacing = tier_tick_spacing(fee)?;
        Self::new_with_tick_spacing(
            token_a,
            token_b,
            fee,
            tick_spacing,
            sqrt_ratio_x96,
            liquidity,
            tick_current,
            tick_data_provider,
        )
    }

    /// Like [`Pool::new`] for pools whose fee is not one of the standard tiers.
    ///
    /// `sqrt_ratio_x96` must lie in `[price(tick_current), price(tick_current + 1)]`;
    /// the upper end is reached after a downward swap stops on a tick.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_tick_spacing(
        token_a: Token,
        token_b: Token,
        fee: u32,
        tick_spacing: i32,
        sqrt_ratio_x96: U256,
        liquidity: u128,
        tick_current: i32,
        tick_data_provider: Arc<P>,
    ) -> Result<Self, Error> {
        if fee >= ONE_IN_PIPS {
            return Err(PoolError::InvalidFee(fee).into());
        }
        check_tick_spacing(tick_spacing)?;
        let (token0, token1) = if token_a.sorts_before(&token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let lower = get_sqrt_ratio_at_tick(tick_current)?;
        let upper = if tick_current < MAX_TICK {
            get_sqrt_ratio_at_tick(tick_current + 1)?
        } else {
            MAX_SQRT_RATIO
        };
        if sqrt_ratio_x96 < lower || sqrt_ratio_x96 > upper {
            return Err(PoolError::PriceOutOfTickRange { tick: tick_current }.into());
        }

        Ok(Self {
            token0,
            token1,
            fee,
            sqrt_ratio_x96,
            liquidity,
            tick_current,
            tick_spacing,
            tick_data_provider,
        })
    }

    #[inline]
    pub fn token0(&self) -> &Token {
        &self.token0
    }

    #[inline]
    pub fn token1(&self) -> &Token {
        &self.token1
    }

    #[inline]
    pub fn fee(&self) -> u32 {
        self.fee
    }

    #[inline]
    pub fn sqrt_ratio_x96(&self) -> U256 {
        self.sqrt_ratio_x96
    }

    #[inline]
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    #[inline]
    pub fn tick_current(&self) -> i32 {
        self.tick_current
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    #[inline]
    pub fn tick_data_provider(&self) -> &Arc<P> {
        &self.tick_data_provider
    }

    #[inline]
    pub fn chain_id(&self) -> u64 {
        self.token0.chain_id
    }

    #[inline]
    pub fn involves_token(&self, token: &Token) -> bool {
        self.token0.equals(token) || self.token1.equals(token)
    }

    /// Deterministic address of this pool under `factory`.
    pub fn address(&self, factory: Address, init_code_hash: B256) -> Result<Address, PoolError> {
        compute_pool_address(
            factory,
            self.token0.address,
            self.token1.address,
            self.fee,
            init_code_hash,
        )
    }

    /// Raw token1 per raw token0, `sqrtPriceX96² / 2^192`.
    pub fn token0_price(&self) -> Result<Price, MathError> {
        let sqrt = widen_u256(self.sqrt_ratio_x96);
        Price::new(self.token0.clone(), self.token1.clone(), sqrt * sqrt, Q192)
    }

    /// Raw token0 per raw token1.
    pub fn token1_price(&self) -> Result<Price, MathError> {
        self.token0_price()?.invert()
    }

    /// Price of `token` in terms of the other pool token.
    pub fn price_of(&self, token: &Token) -> Result<Price, Error> {
        if self.token0.equals(token) {
            Ok(self.token0_price()?)
        } else if self.token1.equals(token) {
            Ok(self.token1_price()?)
        } else {
            Err(SwapError::TokenNotInPool.into())
        }
    }

    fn begin_swap(&self, params: &SwapParams) -> Result<SwapState, SwapError> {
        SwapState::new(
            params,
            self.sqrt_ratio_x96,
            self.tick_current,
            self.liquidity,
            self.fee,
        )
    }

    /// Snapshot after `outcome`, sharing this pool's tick data.
    fn with_outcome(&self, outcome: &SwapOutcome) -> Self {
        Self {
            sqrt_ratio_x96: outcome.sqrt_price_x96,
            liquidity: outcome.liquidity,
            tick_current: outcome.tick,
            ..self.clone()
        }
    }

    fn output_params(
        &self,
        input_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<SwapParams, Error> {
        if !self.involves_token(&input_amount.token) {
            return Err(SwapError::TokenNotInPool.into());
        }
        let zero_for_one = input_amount.token.equals(&self.token0);
        let params = SwapParams::exact_input(zero_for_one, input_amount.raw())?;
        Ok(SwapParams {
            sqrt_price_limit_x96,
            ..params
        })
    }

    fn input_params(
        &self,
        output_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<SwapParams, Error> {
        if !self.involves_token(&output_amount.token) {
            return Err(SwapError::TokenNotInPool.into());
        }
        let zero_for_one = output_amount.token.equals(&self.token1);
        let params = SwapParams::exact_output(zero_for_one, output_amount.raw())?;
        Ok(SwapParams {
            sqrt_price_limit_x96,
            ..params
        })
    }

    fn output_result(&self, params: &SwapParams, outcome: &SwapOutcome) -> (TokenAmount, Self) {
        let (token, amount) = if params.zero_for_one {
            (&self.token1, outcome.amount1)
        } else {
            (&self.token0, outcome.amount0)
        };
        (
            TokenAmount::new(token.clone(), amount.unsigned_abs()),
            self.with_outcome(outcome),
        )
    }

    fn input_result(&self, params: &SwapParams, outcome: &SwapOutcome) -> (TokenAmount, Self) {
        let (token, amount) = if params.zero_for_one {
            (&self.token0, outcome.amount0)
        } else {
            (&self.token1, outcome.amount1)
        };
        (
            TokenAmount::new(token.clone(), amount.unsigned_abs()),
            self.with_outcome(outcome),
        )
    }
}

impl Pool<TickListDataProvider> {
    /// Builds a snapshot over an in-memory tick list, validated at the fee
    /// tier's tick spacing.
    pub fn with_ticks(
        token_a: Token,
        token_b: Token,
        fee: u32,
        sqrt_ratio_x96: U256,
        liquidity: u128,
        tick_current: i32,
        ticks: Vec<Tick>,
    ) -> Result<Self, Error> {
        let tick_spacing = tier_tick_spacing(fee)?;
        let provider = TickListDataProvider::new(ticks, tick_spacing)?;
        Self::new(
            token_a,
            token_b,
            fee,
            sqrt_ratio_x96,
            liquidity,
            tick_current,
            Arc::new(provider),
        )
    }
}

impl Pool<NoTickDataProvider> {
    /// Spot-pricing snapshot; any swap that needs tick data fails with
    /// [`crate::error::TickError::NoTickData`].
    pub fn without_ticks(
        token_a: Token,
        token_b: Token,
        fee: u32,
        sqrt_ratio_x96: U256,
        liquidity: u128,
        tick_current: i32,
    ) -> Result<Self, Error> {
        Self::new(
            token_a,
            token_b,
            fee,
            sqrt_ratio_x96,
            liquidity,
            tick_current,
            Arc::new(NoTickDataProvider),
        )
    }
}

impl<P: TickDataProvider> Pool<P> {
    /// Simulates a swap against this snapshot.
    pub fn swap(&self, params: SwapParams) -> Result<SwapOutcome, Error> {
        let mut state = self.begin_swap(&params)?;

        while !state.is_done() {
            let (tick_next, initialized) = self
                .tick_data_provider
                .next_initialized_tick_within_one_word(
                    state.tick(),
                    state.zero_for_one(),
                    self.tick_spacing,
                )?;

            if let Some(tick) = state.step(tick_next, initialized)? {
                let liquidity_net = self.tick_data_provider.get_tick(tick)?.liquidity_net;
                state.cross(tick, liquidity_net)?;
            }
        }
        Ok(state.finish())
    }

    /// Amount of the other token received for exactly `input_amount`, and the
    /// pool after the trade.
    pub fn get_output_amount(
        &self,
        input_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Self), Error> {
        let params = self.output_params(input_amount, sqrt_price_limit_x96)?;
        let outcome = self.swap(params)?;
        Ok(self.output_result(&params, &outcome))
    }

    /// Amount of the other token required to receive `output_amount`, and the
    /// pool after the trade.
    pub fn get_input_amount(
        &self,
        output_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Self), Error> {
        let params = self.input_params(output_amount, sqrt_price_limit_x96)?;
        let outcome = self.swap(params)?;
        Ok(self.input_result(&params, &outcome))
    }
}

impl<P: AsyncTickDataProvider> Pool<P> {
    /// [`Pool::swap`] over a provider whose lookups suspend. Lookups are
    /// awaited one at a time, in loop order.
    pub async fn swap_async(&self, params: SwapParams) -> Result<SwapOutcome, Error> {
        let mut state = self.begin_swap(&params)?;

        while !state.is_done() {
            let (tick_next, initialized) = self
                .tick_data_provider
                .next_initialized_tick_within_one_word(
                    state.tick(),
                    state.zero_for_one(),
                    self.tick_spacing,
                )
                .await?;

            if let Some(tick) = state.step(tick_next, initialized)? {
                let liquidity_net = self.tick_data_provider.get_tick(tick).await?.liquidity_net;
                state.cross(tick, liquidity_net)?;
            }
        }
        Ok(state.finish())
    }

    pub async fn get_output_amount_async(
        &self,
        input_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Self), Error> {
        let params = self.output_params(input_amount, sqrt_price_limit_x96)?;
        let outcome = self.swap_async(params).await?;
        Ok(self.output_result(&params, &outcome))
    }

    pub async fn get_input_amount_async(
        &self,
        output_amount: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Self), Error> {
        let params = self.input_params(output_amount, sqrt_price_limit_x96)?;
        let outcome = self.swap_async(params).await?;
        Ok(self.input_result(&params, &outcome))
    }
}
