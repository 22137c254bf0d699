use super::{Tick, TickDataProvider};
use crate::error::{Error, TickError};
use crate::math::tick_bitmap::{check_tick_spacing, compress};

/// Queries over a strictly sorted slice of initialized ticks.
pub trait TickList {
    /// Checks the slice can back a pool: positive spacing, aligned indices,
    /// strictly increasing order and net liquidity summing to zero.
    fn validate(&self, tick_spacing: i32) -> Result<(), TickError>;

    /// `true` when `tick` is below the first tick, or the list is empty.
    fn is_below_smallest(&self, tick: i32) -> bool;

    /// `true` when `tick` is at or above the last tick, or the list is empty.
    fn is_at_or_above_largest(&self, tick: i32) -> bool;

    /// Position of the largest tick whose index is `<= tick`.
    fn find_tick_position(&self, tick: i32) -> Result<usize, TickError>;

    fn get_tick(&self, index: i32) -> Result<Tick, TickError>;

    /// Nearest initialized tick at or left of `tick` (`lte`) or strictly
    /// right of it, without any word limit.
    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<Tick, TickError>;

    fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), TickError>;
}

impl TickList for [Tick] {
    fn validate(&self, tick_spacing: i32) -> Result<(), TickError> {
        check_tick_spacing(tick_spacing)?;
        if let Some(tick) = self.iter().find(|t| t.index % tick_spacing != 0) {
            return Err(TickError::NotAligned {
                tick: tick.index,
                tick_spacing,
            });
        }
        if self.windows(2).any(|w| w[0].index >= w[1].index) {
            return Err(TickError::NotSorted);
        }
        let net = self
            .iter()
            .try_fold(0i128, |acc, t| acc.checked_add(t.liquidity_net));
        if net != Some(0) {
            return Err(TickError::NonZeroNet);
        }
        Ok(())
    }

    #[inline]
    fn is_below_smallest(&self, tick: i32) -> bool {
        self.first().is_none_or(|t| tick < t.index)
    }

    #[inline]
    fn is_at_or_above_largest(&self, tick: i32) -> bool {
        self.last().is_none_or(|t| tick >= t.index)
    }

    fn find_tick_position(&self, tick: i32) -> Result<usize, TickError> {
        if self.is_below_smallest(tick) {
            return Err(TickError::BelowSmallest);
        }
        Ok(self.partition_point(|t| t.index <= tick) - 1)
    }

    fn get_tick(&self, index: i32) -> Result<Tick, TickError> {
        let pos = self
            .find_tick_position(index)
            .map_err(|_| TickError::NotFound(index))?;
        let tick = self[pos];
        if tick.index != index {
            return Err(TickError::NotFound(index));
        }
        Ok(tick)
    }

    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<Tick, TickError> {
        if lte {
            if self.is_below_smallest(tick) {
                return Err(TickError::BelowSmallest);
            }
            if self.is_at_or_above_largest(tick) {
                return Ok(self[self.len() - 1]);
            }
            Ok(self[self.find_tick_position(tick)?])
        } else {
            if self.is_at_or_above_largest(tick) {
                return Err(TickError::AtOrAboveLargest);
            }
            if self.is_below_smallest(tick) {
                return Ok(self[0]);
            }
            Ok(self[self.find_tick_position(tick)? + 1])
        }
    }

    fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        lte: bool,
        tick_spacing: i32,
    ) -> Result<(i32, bool), TickError> {
        check_tick_spacing(tick_spacing)?;
        let compressed = compress(tick, tick_spacing);

        if lte {
            let word_pos = compressed >> 8;
            let minimum = (word_pos << 8) * tick_spacing;
            if self.is_below_smallest(tick) {
                return Ok((minimum, false));
            }
            let index = self.next_initialized_tick(tick, lte)?.index;
            let next = minimum.max(index);
            Ok((next, next == index))
        } else {
            let word_pos = (compressed + 1) >> 8;
            let maximum = (((word_pos + 1) << 8) - 1) * tick_spacing;
            if self.is_at_or_above_largest(tick) {
                return Ok((maximum, false));
            }
            let index = self.next_initialized_tick(tick, lte)?.index;
            let next = maximum.min(index);
            Ok((next, next == index))
        }
    }
}

/// In-memory provider over a validated, sorted tick list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickListDataProvider {
    ticks: Vec<Tick>,
    tick_spacing: i32,
}

impl TickListDataProvider {
    pub fn new(ticks: Vec<Tick>, tick_spacing: i32) -> Result<Self, TickError> {
        ticks.validate(tick_spacing)?;
        Ok(Self {
            ticks,
            tick_spacing,
        })
    }

    #[inline]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }
}

impl TickDataProvider for TickListDataProvider {
    #[inline]
    fn get_tick(&self, index: i32) -> Result<Tick, Error> {
        Ok(self.ticks.get_tick(index)?)
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
        Ok(self
            .ticks
            .next_initialized_tick_within_one_word(tick, lte, tick_spacing)?)
    }
}
