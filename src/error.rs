use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("State error - sqrtPrice out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("State error - sqrtPrice is 0")]
    SqrtPriceIsZero,
    #[error("State error - sqrtRatio is 0")]
    SqrtRatioIsZero,

    #[error("State error - tick out of bounds")]
    TickOutOfBounds,

    #[error("State error - liquidity is 0")]
    LiquidityIsZero,

    #[error("State error - requested amount exceeds pool reserves")]
    InsufficientReserves,
}

/// Rejections raised while building a [`crate::Pool`] snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool error - fee {0} must be below 1_000_000 pips")]
    InvalidFee(u32),
    #[error("Pool error - fee {0} is not a known fee tier")]
    UnsupportedFeeTier(u32),
    #[error("Pool error - sqrtPrice is outside the range of tick {tick}")]
    PriceOutOfTickRange { tick: i32 },
    #[error("Pool error - token addresses are identical")]
    IdenticalTokens,
    #[error("Pool error - tokens live on different chains ({0} != {1})")]
    ChainMismatch(u64, u64),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Swap error - token is not part of the pool")]
    TokenNotInPool,
    #[error("Swap error - sqrtPrice limit outside of global bounds")]
    PriceLimitOutOfBounds,
    #[error("Swap error - sqrtPrice limit on the wrong side of the current price")]
    PriceLimitWrongSide,
    #[error("Swap error - amount does not fit a signed 256-bit integer")]
    AmountTooLarge,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("Tick error - no tick data available for traversal")]
    NoTickData,
    #[error("Tick error - tick {0} is not initialized")]
    NotFound(i32),
    #[error("Tick error - tick spacing must be positive")]
    ZeroTickSpacing,
    #[error("Tick error - tick spacing {0} exceeds 16383")]
    TickSpacingTooLarge(i32),
    #[error("Tick error - tick {tick} is not a multiple of spacing {tick_spacing}")]
    NotAligned { tick: i32, tick_spacing: i32 },
    #[error("Tick error - net liquidity of the tick list does not sum to zero")]
    NonZeroNet,
    #[error("Tick error - ticks are not strictly sorted")]
    NotSorted,
    #[error("Tick error - tick is below the smallest initialized tick")]
    BelowSmallest,
    #[error("Tick error - tick is at or above the largest initialized tick")]
    AtOrAboveLargest,
    #[error("Tick error - provider spacing {expected} does not match requested spacing {requested}")]
    TickSpacingMismatch { expected: i32, requested: i32 },
}

#[cfg(feature = "onchain")]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OnchainError {
    #[error("Onchain error - failed to get tick bitmap word: {0}")]
    FailedToGetTickBitmap(String),
    #[error("Onchain error - failed to get tick: {0}")]
    FailedToGetTick(String),
    #[error("Onchain error - tick {0} does not fit int24")]
    InvalidTickIndex(i32),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    PoolError(#[from] PoolError),

    #[error(transparent)]
    SwapError(#[from] SwapError),

    #[error(transparent)]
    TickError(#[from] TickError),

    #[cfg(feature = "onchain")]
    #[error(transparent)]
    OnchainError(#[from] OnchainError),
}
