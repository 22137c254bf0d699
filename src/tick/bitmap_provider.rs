use super::{Tick, TickDataProvider};
use crate::FastMap;
use crate::error::{Error, TickError};
use crate::math::tick_bitmap::{self, compress, position};
use alloy_primitives::U256;
use std::ops::RangeInclusive;

/// Sparse word bitmap plus per-tick metadata, mirroring the pool
/// contract's `tickBitmap` / `ticks` storage.
///
/// A provider built from a partial read of the pool records which words it
/// holds; searching any other word fails with [`TickError::NoTickData`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickBitmapProvider {
    tick_spacing: i32,
    bitmap: FastMap<i16, U256>,
    ticks: FastMap<i32, Tick>,
    loaded_words: Option<RangeInclusive<i16>>,
}

impl TickBitmapProvider {
    pub fn new(tick_spacing: i32) -> Result<Self, TickError> {
        tick_bitmap::check_tick_spacing(tick_spacing)?;
        Ok(Self {
            tick_spacing,
            bitmap: FastMap::default(),
            ticks: FastMap::default(),
            loaded_words: None,
        })
    }

    pub fn from_ticks(
        ticks: impl IntoIterator<Item = Tick>,
        tick_spacing: i32,
    ) -> Result<Self, TickError> {
        let mut provider = Self::new(tick_spacing)?;
        for tick in ticks {
            provider.insert(tick)?;
        }
        Ok(provider)
    }

    /// Restricts word searches to `words`, the bitmap words actually read.
    pub fn with_loaded_words(mut self, words: RangeInclusive<i16>) -> Self {
        self.loaded_words = Some(words);
        self
    }

    /// Stores `tick`, marking it initialized. Re-inserting an index
    /// replaces its metadata.
    pub fn insert(&mut self, tick: Tick) -> Result<(), TickError> {
        if self.ticks.contains_key(&tick.index) {
            self.ticks.insert(tick.index, tick);
            return Ok(());
        }
        tick_bitmap::flip_tick(&mut self.bitmap, tick.index, self.tick_spacing)?;
        self.ticks.insert(tick.index, tick);
        Ok(())
    }

    pub fn remove(&mut self, index: i32) -> Result<Option<Tick>, TickError> {
        let Some(tick) = self.ticks.remove(&index) else {
            return Ok(None);
        };
        tick_bitmap::flip_tick(&mut self.bitmap, index, self.tick_spacing)?;
        Ok(Some(tick))
    }

    /// Toggles the bitmap bit of `tick` without touching its metadata.
    pub fn flip_tick(&mut self, tick: i32) -> Result<(), TickError> {
        tick_bitmap::flip_tick(&mut self.bitmap, tick, self.tick_spacing)
    }

    /// Overwrites a whole bitmap word, as read from the pool contract.
    pub fn set_word(&mut self, word_pos: i16, word: U256) {
        if word.is_zero() {
            self.bitmap.remove(&word_pos);
        } else {
            self.bitmap.insert(word_pos, word);
        }
    }

    #[inline]
    pub fn is_initialized(&self, tick: i32) -> bool {
        if tick % self.tick_spacing != 0 {
            return false;
        }
        let (word_pos, bit_pos) = position(tick / self.tick_spacing);
        tick_bitmap::get_word(&self.bitmap, word_pos).bit(bit_pos as usize)
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    #[inline]
    pub fn bitmap(&self) -> &FastMap<i16, U256> {
        &self.bitmap
    }

    #[inline]
    pub fn ticks(&self) -> &FastMap<i32, Tick> {
        &self.ticks
    }

    /// `None` when the provider holds the complete bitmap.
    #[inline]
    pub fn loaded_words(&self) -> Option<&RangeInclusive<i16>> {
        self.loaded_words.as_ref()
    }
}

impl TickDataProvider for TickBitmapProvider {
    #[inline]
    fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        self.ticks
            .get(&index)
            .copied()
            .ok_or_else(|| TickError::NotFound(index).into())
    }

    #[inline]
    fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        if tick_spacing != self.tick_spacing {
            return Err(TickError::TickSpacingMismatch {
                expected: self.tick_spacing,
                requested: tick_spacing,
            }
            .into());
        }
        if let Some(words) = &self.loaded_words {
            let compressed = compress(tick, tick_spacing);
            let (word_pos, _) = position(if lte { compressed } else { compressed + 1 });
            if !words.contains(&word_pos) {
                return Err(TickError::NoTickData.into());
            }
        }
        tick_bitmap::next_initialized_tick_within_one_word(&self.bitmap, tick, tick_spacing, lte)
    }
}
