use super::{Tick, TickDataProvider};
use crate::error::{Error, TickError};

/// Provider for pools used only for spot pricing. Any traversal fails
/// with [`TickError::NoTickData`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoTickDataProvider;

impl TickDataProvider for NoTickDataProvider {
    #[inline]
    fn get_tick(&self, _index: i32) -> Result<Tick, Error> {
        Err(TickError::NoTickData.into())
    }

    #[inline]
    fn next_initialized_tick_within_one_word(
        &self,
        _tick: i32,
        _lte: bool,
        _tick_spacing: i32,
    ) -> Result<(i32, bool), Error> {
        Err(TickError::NoTickData.into())
    }
}
