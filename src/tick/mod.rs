//! Initialized-tick metadata and the capabilities the swap loop uses to
//! walk it.
//!
//! [`TickDataProvider`] is the synchronous oracle used by [`crate::Pool`]
//! quoting. [`AsyncTickDataProvider`] is the same contract for sources that
//! fetch lazily; each call is a suspension point of the async swap and the
//! loop awaits them strictly in order.

mod bitmap_provider;
mod no_tick_data;
#[cfg(feature = "onchain")]
pub mod onchain;
pub mod tick_list;

pub use bitmap_provider::TickBitmapProvider;
pub use no_tick_data::NoTickDataProvider;
pub use tick_list::{TickList, TickListDataProvider};

use crate::error::{Error, StateError};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use std::future::Future;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tick {
    pub index: i32,
    /// Total liquidity referencing this tick from either side.
    pub liquidity_gross: u128,
    /// Liquidity added when the tick is crossed left to right.
    pub liquidity_net: i128,
}

impl Tick {
    pub fn new(index: i32, liquidity_gross: u128, liquidity_net: i128) -> Result<Self, StateError> {
        if !(MIN_TICK..=MAX_TICK).contains(&index) {
            return Err(StateError::TickOutOfBounds);
        }
        Ok(Self {
            index,
            liquidity_gross,
            liquidity_net,
        })
    }
}

/// Read-only source of initialized ticks.
pub trait TickDataProvider {
    /// Returns the tick stored at `index`, which must be initialized.
    fn get_tick(&self, index: i32) -> Result<Tick, Error>;

    /// Next initialized tick from `tick` within one bitmap word, searching
    /// left (`lte`, inclusive) or right (exclusive). Hitting the word
    /// boundary returns the boundary tick with `false`.
    fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error>;
}

/// [`TickDataProvider`] whose lookups may suspend.
pub trait AsyncTickDataProvider: Send + Sync {
    fn get_tick(&self, index: i32) -> impl Future<Output = Result<Tick, Error>> + Send;

    fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> impl Future<Output = Result<(i32, bool), Error>> + Send;
}
