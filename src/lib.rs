//! Concentrated-liquidity (Uniswap V3 style) swap quoting in pure Rust.
//!
//! This crate exposes:
//! - Low‑level fixed‑point primitives (`math::*`) for ticks, prices, bitmaps
//!   and single swap steps, bit‑exact with the on‑chain contracts.
//! - Tick data capabilities (`tick::*`): a sorted tick list, a sparse word
//!   bitmap, a "no data" stub, and an async variant for lazily fetched ticks.
//! - An immutable [`Pool`] snapshot whose quoting methods return the realized
//!   amount together with a *new* snapshot describing the post‑trade state.
//! - Optional `onchain` helpers that read tick data from a live pool.
//!
//! # Examples
//!
//! ## Pure math
//! ```
//! use clmm_swap_engine::{math::tick_math, RESOLUTION, U256};
//!
//! let sqrt_price = tick_math::get_sqrt_ratio_at_tick(0).unwrap();
//! assert_eq!(sqrt_price, U256::ONE << 96);
//! assert_eq!(tick_math::get_tick_at_sqrt_ratio(sqrt_price).unwrap(), 0);
//! assert_eq!(RESOLUTION, 96);
//! ```
//!
//! ## Quoting a swap
//! ```
//! use clmm_swap_engine::{
//!     math::tick_math::get_sqrt_ratio_at_tick, Address, Pool, Tick, Token, TokenAmount, U256,
//! };
//!
//! let usdc = Token::new(1, Address::with_last_byte(1), 6, Some("USDC"));
//! let weth = Token::new(1, Address::with_last_byte(2), 18, Some("WETH"));
//!
//! let ticks = vec![
//!     Tick::new(-887220, 1_000_000_000, 1_000_000_000).unwrap(),
//!     Tick::new(887220, 1_000_000_000, -1_000_000_000).unwrap(),
//! ];
//! let pool = Pool::with_ticks(
//!     usdc.clone(),
//!     weth,
//!     3000,
//!     get_sqrt_ratio_at_tick(0).unwrap(),
//!     1_000_000_000,
//!     0,
//!     ticks,
//! )
//! .unwrap();
//!
//! let (amount_out, after) = pool
//!     .get_output_amount(&TokenAmount::new(usdc, U256::from(1_000u64)), None)
//!     .unwrap();
//! assert!(amount_out.raw() > U256::ZERO);
//! assert!(after.sqrt_ratio_x96() < pool.sqrt_ratio_x96());
//! ```

pub use alloy_primitives::{Address, I256, U256, U512};

pub mod error;
mod hash;
pub mod math;
pub mod pool;
pub mod tick;

pub use error::Error;
pub use hash::FastMap;
pub use pool::fee::FeeAmount;
pub use pool::price::Price;
pub use pool::swap::{SwapOutcome, SwapParams};
pub use pool::token::{Token, TokenAmount};
pub use pool::v3_pool::Pool;
pub use tick::{
    AsyncTickDataProvider, NoTickDataProvider, Tick, TickBitmapProvider, TickDataProvider,
    TickListDataProvider,
};

const U256_1: U256 = U256::from_limbs([1, 0, 0, 0]);
const U256_E6: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

const U160_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Fee denominator: fees are expressed in hundredths of a basis point.
pub const ONE_IN_PIPS: u32 = 1_000_000;

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
pub const Q192: U512 = U512::from_limbs([0, 0, 0, 1, 0, 0, 0, 0]);
