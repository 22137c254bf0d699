//! Tick data read from a deployed pool contract.

use super::{AsyncTickDataProvider, Tick, TickBitmapProvider};
use crate::FastMap;
use crate::error::{Error, OnchainError, TickError};
use crate::math::tick_bitmap::{
    self, check_tick_spacing, compress, position, search_word_range,
};
use crate::pool::fee::FeeAmount;
use alloy::primitives::aliases::I24;
use alloy::primitives::{Address, BlockNumber, U256};
use alloy::providers::Provider;
use alloy::sol;
use tracing::debug;

sol! {
    #[sol(rpc)]
    interface IUniswapV3PoolTicks {
        function tickBitmap(int16 wordPosition) external view returns (uint256);
        function ticks(int24 tick) external view returns (
            uint128 liquidityGross,
            int128 liquidityNet,
            uint256 feeGrowthOutside0X128,
            uint256 feeGrowthOutside1X128,
            int56 tickCumulativeOutside,
            uint160 secondsPerLiquidityOutsideX128,
            uint32 secondsOutside,
            bool initialized
        );
    }
}

use IUniswapV3PoolTicks::IUniswapV3PoolTicksInstance;

/// Reads one bitmap word per traversal step and one tick per crossing,
/// optionally pinned to `block_number`.
pub struct OnchainTickDataProvider<P> {
    pool: IUniswapV3PoolTicksInstance<P>,
    block_number: Option<BlockNumber>,
}

impl<P: Provider> OnchainTickDataProvider<P> {
    pub fn new(pool_address: Address, provider: P, block_number: Option<BlockNumber>) -> Self {
        Self {
            pool: IUniswapV3PoolTicks::new(pool_address, provider),
            block_number,
        }
    }

    #[inline]
    pub fn pool_address(&self) -> Address {
        *self.pool.address()
    }

    #[inline]
    pub fn block_number(&self) -> Option<BlockNumber> {
        self.block_number
    }

    pub async fn fetch_word(&self, word_pos: i16) -> Result<U256, OnchainError> {
        let mut call = self.pool.tickBitmap(word_pos);
        if let Some(bn) = self.block_number {
            call = call.block(bn.into());
        }
        call.call()
            .await
            .map_err(|e| OnchainError::FailedToGetTickBitmap(e.to_string()))
    }

    /// Fetches `index`; an index with no gross liquidity is not initialized.
    pub async fn fetch_tick(&self, index: i32) -> Result<Tick, Error> {
        let encoded = I24::try_from(index).map_err(|_| OnchainError::InvalidTickIndex(index))?;
        let mut call = self.pool.ticks(encoded);
        if let Some(bn) = self.block_number {
            call = call.block(bn.into());
        }
        let info = call
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetTick(e.to_string()))?;

        if info.liquidityGross == 0 {
            return Err(TickError::NotFound(index).into());
        }
        Ok(Tick::new(index, info.liquidityGross, info.liquidityNet)?)
    }
}

impl<P: Provider> AsyncTickDataProvider for OnchainTickDataProvider<P> {
    async fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        self.fetch_tick(index).await
    }

    async fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        check_tick_spacing(tick_spacing)?;
        let compressed = compress(tick, tick_spacing);
        let (word_pos, _) = position(if lte { compressed } else { compressed + 1 });

        let mut bitmap = FastMap::default();
        bitmap.insert(word_pos, self.fetch_word(word_pos).await?);
        tick_bitmap::next_initialized_tick_within_one_word(&bitmap, tick, tick_spacing, lte)
    }
}

/// Eagerly loads the bitmap words within the fee tier's scan window on
/// both sides of `tick_current`, plus every initialized tick they hold.
///
/// The provider only answers searches inside the loaded words; a swap that
/// leaves the window fails with [`TickError::NoTickData`].
pub async fn load_tick_window<P: Provider>(
    provider: P,
    pool_address: Address,
    tick_current: i32,
    fee: FeeAmount,
    block_number: Option<BlockNumber>,
) -> Result<TickBitmapProvider, Error> {
    let tick_spacing = fee.tick_spacing();
    let reader = OnchainTickDataProvider::new(pool_address, provider, block_number);

    let mut words = search_word_range(tick_current, tick_spacing, true, fee.scan_words())?;
    words.extend(search_word_range(
        tick_current,
        tick_spacing,
        false,
        fee.scan_words(),
    )?);
    words.sort_unstable();
    words.dedup();
    let (Some(&first), Some(&last)) = (words.first(), words.last()) else {
        return Err(TickError::NoTickData.into());
    };

    let mut loaded = TickBitmapProvider::new(tick_spacing)?.with_loaded_words(first..=last);
    for word_pos in words {
        let word = reader.fetch_word(word_pos).await?;
        if word.is_zero() {
            continue;
        }
        for bit in 0..256usize {
            if !word.bit(bit) {
                continue;
            }
            let index = ((word_pos as i32) * 256 + bit as i32) * tick_spacing;
            loaded.insert(reader.fetch_tick(index).await?)?;
        }
    }

    debug!(
        pool = %pool_address,
        words = loaded.bitmap().len(),
        ticks = loaded.ticks().len(),
        "loaded tick window"
    );
    Ok(loaded)
}
