use crate::error::StateError;
use crate::math::bit_math::most_significant_bit;
use alloy_primitives::{I256, U256};

/// Lowest tick whose price `1.0001^tick` fits a Q64.96 sqrt price.
pub const MIN_TICK: i32 = -887272;
/// Highest tick, `-MIN_TICK`.
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_ratio_at_tick(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// `get_sqrt_ratio_at_tick(MAX_TICK)`; valid sqrt prices are strictly below.
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// `log_sqrt(1.0001)(2)` in Q128.128.
const LOG_SQRT_10001: I256 =
    I256::from_raw(U256::from_limbs([11745905768312294533, 13863, 0, 0]));
/// Error bounds of the log approximation.
const TICK_LOW_ERROR: I256 = I256::from_raw(U256::from_limbs([
    6552757943157144234,
    184476617836266586,
    0,
    0,
]));
const TICK_HIGH_ERROR: I256 = I256::from_raw(U256::from_limbs([
    4998474450511881007,
    15793544031827761793,
    0,
    0,
]));

const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

/// `2^128 / sqrt(1.0001)^(2^i)` for i = 1..=19, applied per set bit of |tick|.
const BIT_FACTORS: [(u32, U256); 19] = [
    (0x2, U256::from_limbs([6459403834229662010, 18444899583751176498, 0, 0])),
    (0x4, U256::from_limbs([17226890335427755468, 18443055278223354162, 0, 0])),
    (0x8, U256::from_limbs([2032852871939366096, 18439367220385604838, 0, 0])),
    (0x10, U256::from_limbs([14545316742740207172, 18431993317065449817, 0, 0])),
    (0x20, U256::from_limbs([5129152022828963008, 18417254355718160513, 0, 0])),
    (0x40, U256::from_limbs([4894419605888772193, 18387811781193591352, 0, 0])),
    (0x80, U256::from_limbs([1280255884321894483, 18329067761203520168, 0, 0])),
    (0x100, U256::from_limbs([15924666964335305636, 18212142134806087854, 0, 0])),
    (0x200, U256::from_limbs([8010504389359918676, 17980523815641551639, 0, 0])),
    (0x400, U256::from_limbs([10668036004952895731, 17526086738831147013, 0, 0])),
    (0x800, U256::from_limbs([4878133418470705625, 16651378430235024244, 0, 0])),
    (0x1000, U256::from_limbs([9537173718739605541, 15030750278693429944, 0, 0])),
    (0x2000, U256::from_limbs([9972618978014552549, 12247334978882834399, 0, 0])),
    (0x4000, U256::from_limbs([10428997489610666743, 8131365268884726200, 0, 0])),
    (0x8000, U256::from_limbs([9305304367709015974, 3584323654723342297, 0, 0])),
    (0x10000, U256::from_limbs([14301143598189091785, 696457651847595233, 0, 0])),
    (0x20000, U256::from_limbs([7393154844743099908, 26294789957452057, 0, 0])),
    (0x40000, U256::from_limbs([2209338891292245656, 37481735321082, 0, 0])),
    (0x80000, U256::from_limbs([10518117631919034274, 76158723, 0, 0])),
];

/// Factor for bit 0 of |tick|.
const BIT0_FACTOR: U256 = U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0]);

/// Returns the sqrt price (Q64.96) at `tick`, i.e. `sqrt(1.0001^tick) * 2^96`,
/// or `StateError::TickOutOfBounds` outside `[MIN_TICK, MAX_TICK]`.
///
/// The ratio is accumulated in Q128.128 for `-|tick|` (one multiply per set
/// bit), inverted for positive ticks, then narrowed to Q64.96 rounding up so
/// that `get_tick_at_sqrt_ratio` of the result is exactly `tick`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfBounds);
    }

    let mut ratio = if abs_tick & 0x1 != 0 {
        BIT0_FACTOR
    } else {
        Q128
    };
    for (bit, factor) in BIT_FACTORS {
        if abs_tick & bit != 0 {
            ratio = ratio.wrapping_mul(factor) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let round_up = ratio.as_limbs()[0] & 0xFFFF_FFFF != 0;
    Ok((ratio >> 32) + U256::from(round_up as u8))
}

/// Returns the greatest tick whose sqrt price is `<= sqrt_price_x96`.
///
/// Fails with `StateError::SqrtPriceOutOfBounds` unless
/// `MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO`.
///
/// The bit length gives the integer part of `log2`, 14 squaring rounds give
/// the fractional bits, and the result is scaled to `log_sqrt(1.0001)`. The
/// approximation error leaves two candidates which are resolved with one
/// forward evaluation.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, StateError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(StateError::SqrtPriceOutOfBounds);
    }

    // Q128.128
    let ratio = sqrt_price_x96 << 32;
    let msb = most_significant_bit(ratio).map_err(|_| StateError::SqrtPriceIsZero)? as usize;

    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    let mut log_2: I256 = (I256::from_raw(U256::from(msb)) - I256::from_raw(U256::from(128u8)))
        << 64usize;

    for shift in (50..=63usize).rev() {
        r = r.wrapping_mul(r) >> 127;
        let f = r >> 128usize;
        log_2 |= I256::from_raw(f << shift);
        r >>= f.as_limbs()[0] as usize;
    }

    let log_sqrt10001 = log_2.wrapping_mul(LOG_SQRT_10001);
    let tick_low = ((log_sqrt10001 - TICK_LOW_ERROR) >> 128usize).low_i32();
    let tick_high = ((log_sqrt10001 + TICK_HIGH_ERROR) >> 128usize).low_i32();

    if tick_low == tick_high {
        return Ok(tick_low);
    }
    if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Rounds `tick` to the nearest multiple of `tick_spacing` that stays within
/// `[MIN_TICK, MAX_TICK]`. Ties round away from zero.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, StateError> {
    if tick_spacing <= 0 || !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(StateError::TickOutOfBounds);
    }
    let remainder = tick % tick_spacing;
    let mut rounded = tick - remainder;
    if remainder.abs() * 2 >= tick_spacing {
        rounded += tick_spacing * remainder.signum();
    }
    Ok(if rounded < MIN_TICK {
        rounded + tick_spacing
    } else if rounded > MAX_TICK {
        rounded - tick_spacing
    } else {
        rounded
    })
}
