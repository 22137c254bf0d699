use crate::RESOLUTION;
use crate::math::math_helpers::{
    div_rounding_up, mul_div, mul_div_rounding_up, narrow_u512, sqrt_u512, unlikely, widen_u256,
};
use crate::{
    Q96, U160_MAX,
    error::{Error, MathError, StateError},
};
use alloy_primitives::{I256, U256};

#[inline]
fn to_uint160(x: U256) -> Result<U256, MathError> {
    if x > U160_MAX {
        Err(MathError::Overflow)
    } else {
        Ok(x)
    }
}

/// Next sqrt price after adding or removing `amount` of token0, rounding
/// up so the price never moves further than the amount pays for.
///
/// Uses `L·√P / (L + Δx·√P)` when the product fits 256 bits and the
/// algebraically equal `L / (L/√P + Δx)` otherwise.
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    if amount.is_zero() {
        return Ok(sqrt_p_x96);
    }

    let numerator1: U256 = U256::from(liquidity) << RESOLUTION;
    let product: U256 = amount.wrapping_mul(sqrt_p_x96);
    let product_fits = product / amount == sqrt_p_x96;

    if add {
        if product_fits {
            let (denominator, overflowed) = numerator1.overflowing_add(product);
            if !overflowed {
                return Ok(to_uint160(mul_div_rounding_up(
                    numerator1,
                    sqrt_p_x96,
                    denominator,
                )?)?);
            }
        }
        let denominator = (numerator1 / sqrt_p_x96)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        Ok(to_uint160(div_rounding_up(numerator1, denominator)?)?)
    } else {
        if !product_fits || numerator1 <= product {
            return Err(StateError::InsufficientReserves.into());
        }
        let denominator = numerator1 - product;
        Ok(to_uint160(mul_div_rounding_up(
            numerator1,
            sqrt_p_x96,
            denominator,
        )?)?)
    }
}

/// Next sqrt price after adding or removing `amount` of token1, rounding
/// down: `√P ± Δy / L`.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    if unlikely(liquidity == 0) {
        return Err(MathError::DivisionByZero.into());
    }
    let liquidity = U256::from(liquidity);
    if add {
        let quotient: U256 = if amount <= U160_MAX {
            (amount << RESOLUTION) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };

        let result = sqrt_p_x96
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?;
        Ok(to_uint160(result)?)
    } else {
        let quotient: U256 = if amount <= U160_MAX {
            div_rounding_up(amount << RESOLUTION, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };

        if sqrt_p_x96 <= quotient {
            return Err(StateError::InsufficientReserves.into());
        }
        Ok(sqrt_p_x96 - quotient)
    }
}

/// Amount of token0 between two sqrt prices for `liquidity`:
/// `L · (√b − √a) / (√a · √b)`, in either rounding direction.
pub fn get_amount_0_delta_base(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    if sqrt_ratio_a_x96.is_zero() {
        return Err(StateError::SqrtRatioIsZero.into());
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_ratio_b_x96 - sqrt_ratio_a_x96;

    if round_up {
        Ok(div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_b_x96)?,
            sqrt_ratio_a_x96,
        )?)
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_b_x96)? / sqrt_ratio_a_x96)
    }
}

/// Amount of token1 between two sqrt prices for `liquidity`:
/// `L · (√b − √a)`, in either rounding direction.
pub fn get_amount_1_delta_base(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    }
}

/// Signed token0 delta for a signed liquidity change. Added liquidity
/// rounds up (owed to the pool), removed liquidity rounds down.
pub fn get_amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, Error> {
    let magnitude = get_amount_0_delta_base(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    let amount = I256::try_from(magnitude).map_err(|_| MathError::Overflow)?;
    Ok(if liquidity < 0 { -amount } else { amount })
}

/// Signed token1 delta for a signed liquidity change.
pub fn get_amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, Error> {
    let magnitude = get_amount_1_delta_base(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    let amount = I256::try_from(magnitude).map_err(|_| MathError::Overflow)?;
    Ok(if liquidity < 0 { -amount } else { amount })
}

/// Next sqrt price for an exact `amount_in` of the input token.
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if unlikely(sqrt_p_x96.is_zero()) {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if unlikely(liquidity == 0) {
        return Err(StateError::LiquidityIsZero.into());
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x96, liquidity, amount_in, true)
    }
}

/// Next sqrt price for an exact `amount_out` of the output token.
pub fn get_next_sqrt_price_from_output(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if unlikely(sqrt_p_x96.is_zero()) {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if unlikely(liquidity == 0) {
        return Err(StateError::LiquidityIsZero.into());
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x96, liquidity, amount_out, false)
    }
}

/// Encodes the price `amount1 / amount0` as a Q64.96 sqrt price,
/// `floor(sqrt((amount1 << 192) / amount0))`.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U256, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let ratio_x192 = (widen_u256(amount1) << 192) / widen_u256(amount0);
    narrow_u512(sqrt_u512(ratio_x192))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::U256_1;
    use std::str::FromStr;

    const U256_2: U256 = U256::from_limbs([2, 0, 0, 0]);

    fn u(s: &str) -> U256 {
        U256::from_str(s).unwrap()
    }

    // 1.0 and 1.21 as Q64.96 sqrt prices
    const PRICE_1: &str = "79228162514264337593543950336";
    const PRICE_1_21: &str = "87150978765690771352898345369";

    #[test]
    fn next_sqrt_price_from_input_rejects_degenerate_state() {
        let result = get_next_sqrt_price_from_input(U256::ZERO, 0, U256::from(100u8), false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::SqrtPriceIsZero))
        ));

        let result = get_next_sqrt_price_from_input(U256_1, 0, U256::from(100u8), true);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::LiquidityIsZero))
        ));
    }

    #[test]
    fn next_sqrt_price_from_input_overflow_and_underflow() {
        // input amount overflows the price
        let result = get_next_sqrt_price_from_input(U160_MAX, 1024, U256::from(1024), false);
        assert!(matches!(result, Err(Error::MathError(MathError::Overflow))));

        // any input amount cannot underflow the price
        let result = get_next_sqrt_price_from_input(U256_1, 1, U256::ONE << 255, true);
        assert_eq!(result.unwrap(), U256_1);

        // the minimum price for max inputs
        let sqrt_price = U160_MAX;
        let liquidity = u128::MAX;
        let max_amount_no_overflow = U256::MAX - ((U256::from(liquidity) << 96) / sqrt_price);
        let result =
            get_next_sqrt_price_from_input(sqrt_price, liquidity, max_amount_no_overflow, true);
        assert_eq!(result.unwrap(), U256_1);
    }

    #[test]
    fn next_sqrt_price_from_input_values() {
        // zero input returns the input price in both directions
        for zero_for_one in [true, false] {
            let result =
                get_next_sqrt_price_from_input(u(PRICE_1), 1e17 as u128, U256::ZERO, zero_for_one);
            assert_eq!(result.unwrap(), u(PRICE_1));
        }

        // 0.1 token1 in
        let result =
            get_next_sqrt_price_from_input(u(PRICE_1), 1e18 as u128, u("100000000000000000"), false);
        assert_eq!(result.unwrap(), u(PRICE_1_21));

        // 0.1 token0 in
        let result =
            get_next_sqrt_price_from_input(u(PRICE_1), 1e18 as u128, u("100000000000000000"), true);
        assert_eq!(result.unwrap(), u("72025602285694852357767227579"));

        // amountIn > type(uint96).max and zeroForOne = true
        let result = get_next_sqrt_price_from_input(
            u(PRICE_1),
            1e19 as u128,
            u("1267650600228229401496703205376"),
            true,
        );
        assert_eq!(result.unwrap(), u("624999999995069620"));

        // can return 1 with enough amountIn and zeroForOne = true
        let result = get_next_sqrt_price_from_input(u(PRICE_1), 1, U256::MAX / U256_2, true);
        assert_eq!(result.unwrap(), U256_1);
    }

    #[test]
    fn next_sqrt_price_from_output_reserve_limits() {
        let price = u("20282409603651670423947251286016");

        // exactly / more than the virtual reserves of token0
        for amount in [4u64, 5] {
            let result = get_next_sqrt_price_from_output(price, 1024, U256::from(amount), false);
            assert!(matches!(
                result,
                Err(Error::StateError(StateError::InsufficientReserves))
            ));
        }

        // exactly / more than the virtual reserves of token1
        for amount in [262144u64, 262145] {
            let result = get_next_sqrt_price_from_output(price, 1024, U256::from(amount), true);
            assert!(matches!(
                result,
                Err(Error::StateError(StateError::InsufficientReserves))
            ));
        }

        // just less than the virtual reserves of token1
        let result = get_next_sqrt_price_from_output(price, 1024, U256::from(262143), true);
        assert_eq!(result.unwrap(), u("77371252455336267181195264"));
    }

    #[test]
    fn next_sqrt_price_from_output_values() {
        for zero_for_one in [true, false] {
            let result =
                get_next_sqrt_price_from_output(u(PRICE_1), 1e17 as u128, U256::ZERO, zero_for_one);
            assert_eq!(result.unwrap(), u(PRICE_1));
        }

        // 0.1 token1 out
        let result =
            get_next_sqrt_price_from_output(u(PRICE_1), 1e18 as u128, U256::from(1e17 as u128), false);
        assert_eq!(result.unwrap(), u("88031291682515930659493278152"));

        // 0.1 token0 out
        let result =
            get_next_sqrt_price_from_output(u(PRICE_1), 1e18 as u128, U256::from(1e17 as u128), true);
        assert_eq!(result.unwrap(), u("71305346262837903834189555302"));

        let result = get_next_sqrt_price_from_output(u(PRICE_1), 1, U256::MAX, true);
        assert!(matches!(result, Err(Error::MathError(MathError::Overflow))));

        let result = get_next_sqrt_price_from_output(u(PRICE_1), 1, U256::MAX, false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InsufficientReserves))
        ));
    }

    #[test]
    fn amount_0_delta() {
        let amount_0 = get_amount_0_delta_base(u(PRICE_1), u(PRICE_1), 0, true);
        assert_eq!(amount_0.unwrap(), U256::ZERO);

        let amount_0 = get_amount_0_delta_base(u(PRICE_1), u(PRICE_1_21), 0, true);
        assert_eq!(amount_0.unwrap(), U256::ZERO);

        // 0.1 amount0 for price of 1 to 1.21
        let amount_0 = get_amount_0_delta_base(u(PRICE_1), u(PRICE_1_21), 1e18 as u128, true).unwrap();
        assert_eq!(amount_0, u("90909090909090910"));

        let amount_0_rounded_down =
            get_amount_0_delta_base(u(PRICE_1), u(PRICE_1_21), 1e18 as u128, false).unwrap();
        assert_eq!(amount_0_rounded_down, amount_0 - U256_1);

        // prices whose product overflows 256 bits
        let low = u("2787593149816327892691964784081045188247552");
        let high = u("22300745198530623141535718272648361505980416");
        let amount_0_up = get_amount_0_delta_base(low, high, 1e18 as u128, true).unwrap();
        let amount_0_down = get_amount_0_delta_base(low, high, 1e18 as u128, false).unwrap();
        assert_eq!(amount_0_up, amount_0_down + U256_1);

        assert!(matches!(
            get_amount_0_delta_base(U256::ZERO, u(PRICE_1), 1, true),
            Err(Error::StateError(StateError::SqrtRatioIsZero))
        ));
    }

    #[test]
    fn amount_1_delta() {
        let amount_1 = get_amount_1_delta_base(u(PRICE_1), u(PRICE_1_21), 0, true);
        assert_eq!(amount_1.unwrap(), U256::ZERO);

        let amount_1 = get_amount_1_delta_base(u(PRICE_1), u(PRICE_1_21), 1e18 as u128, true).unwrap();
        assert_eq!(amount_1, u("100000000000000000"));

        let amount_1_rounded_down =
            get_amount_1_delta_base(u(PRICE_1), u(PRICE_1_21), 1e18 as u128, false).unwrap();
        assert_eq!(amount_1_rounded_down, amount_1 - U256_1);
    }

    #[test]
    fn signed_deltas_round_by_liquidity_sign() {
        let added = get_amount_1_delta(u(PRICE_1), u(PRICE_1_21), 1e18 as i128).unwrap();
        let removed = get_amount_1_delta(u(PRICE_1), u(PRICE_1_21), -(1e18 as i128)).unwrap();
        assert_eq!(added, I256::try_from(100000000000000000u64).unwrap());
        assert_eq!(removed, -I256::try_from(99999999999999999u64).unwrap());

        let added = get_amount_0_delta(u(PRICE_1), u(PRICE_1_21), 1e18 as i128).unwrap();
        let removed = get_amount_0_delta(u(PRICE_1), u(PRICE_1_21), -(1e18 as i128)).unwrap();
        assert_eq!(added, I256::try_from(90909090909090910u64).unwrap());
        assert_eq!(removed, -I256::try_from(90909090909090909u64).unwrap());
    }

    #[test]
    fn swap_computation_round_trips_amount() {
        let sqrt_price = u("1025574284609383690408304870162715216695788925244");
        let liquidity = 50015962439936049619261659728067971248;
        let amount_in = U256::from(406);

        let sqrt_q = get_next_sqrt_price_from_input(sqrt_price, liquidity, amount_in, true).unwrap();
        assert_eq!(
            sqrt_q,
            u("1025574284609383582644711336373707553698163132913")
        );

        let amount_0_delta = get_amount_0_delta_base(sqrt_q, sqrt_price, liquidity, true).unwrap();
        assert_eq!(amount_0_delta, U256::from(406));
    }

    #[test]
    fn encode_sqrt_ratio_x96_known_values() {
        assert_eq!(encode_sqrt_ratio_x96(U256::ONE, U256::ONE).unwrap(), Q96);
        assert_eq!(
            encode_sqrt_ratio_x96(U256::from(100u8), U256::ONE).unwrap(),
            u("792281625142643375935439503360")
        );
        assert_eq!(
            encode_sqrt_ratio_x96(U256::ONE, U256::from(100u8)).unwrap(),
            u("7922816251426433759354395033")
        );
        assert_eq!(
            encode_sqrt_ratio_x96(U256::from(111u8), U256::from(333u16)).unwrap(),
            u("45742400955009932534161870629")
        );
        assert!(matches!(
            encode_sqrt_ratio_x96(U256::ONE, U256::ZERO),
            Err(MathError::DivisionByZero)
        ));
    }
}
