#![allow(dead_code)]

use clmm_swap_engine::math::{
    bit_math, liquidity_math, math_helpers, sqrt_price_math, swap_math, tick_bitmap, tick_math,
};
use clmm_swap_engine::{
    Address, FastMap, I256, Pool, SwapParams, Tick, TickBitmapProvider, TickListDataProvider,
    Token, TokenAmount, U256,
};
use criterion::Criterion;
use std::hint::black_box;
use std::str::FromStr;

pub fn usdc() -> Token {
    Token::new(1, Address::with_last_byte(1), 6, Some("USDC"))
}

pub fn weth() -> Token {
    Token::new(1, Address::with_last_byte(2), 18, Some("WETH"))
}

/// Twenty stacked ranges around tick 0 at spacing 60.
pub fn ladder_ticks() -> Vec<Tick> {
    let mut ticks = Vec::new();
    for i in (1..=20).rev() {
        ticks.push(Tick::new(-i * 600, 1_000_000_000_000, 1_000_000_000_000).unwrap());
    }
    for i in 1..=20 {
        ticks.push(Tick::new(i * 600, 1_000_000_000_000, -1_000_000_000_000).unwrap());
    }
    ticks
}

pub fn ladder_pool() -> Pool<TickListDataProvider> {
    Pool::with_ticks(
        usdc(),
        weth(),
        3000,
        tick_math::get_sqrt_ratio_at_tick(0).unwrap(),
        20_000_000_000_000,
        0,
        ladder_ticks(),
    )
    .unwrap()
}

pub fn bitmap_pool() -> Pool<TickBitmapProvider> {
    let provider = TickBitmapProvider::from_ticks(ladder_ticks(), 60).unwrap();
    Pool::new(
        usdc(),
        weth(),
        3000,
        tick_math::get_sqrt_ratio_at_tick(0).unwrap(),
        20_000_000_000_000,
        0,
        std::sync::Arc::new(provider),
    )
    .unwrap()
}

pub fn bench_tick_math(c: &mut Criterion) {
    let sqrt = U256::from_str("1046706758115479018135889").unwrap();
    c.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| tick_math::get_sqrt_ratio_at_tick(black_box(-224701)))
    });
    c.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| tick_math::get_tick_at_sqrt_ratio(black_box(sqrt)))
    });
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let a = tick_math::get_sqrt_ratio_at_tick(-600).unwrap();
    let b_price = tick_math::get_sqrt_ratio_at_tick(600).unwrap();
    let liquidity = 10u128.pow(18);
    let amount = U256::from(10u64.pow(15));

    c.bench_function("get_next_sqrt_price_from_input", |b| {
        b.iter(|| {
            sqrt_price_math::get_next_sqrt_price_from_input(
                black_box(b_price),
                black_box(liquidity),
                black_box(amount),
                true,
            )
        })
    });
    c.bench_function("get_amount_0_delta", |b| {
        b.iter(|| {
            sqrt_price_math::get_amount_0_delta(black_box(a), black_box(b_price), black_box(-1))
        })
    });
    c.bench_function("get_amount_1_delta_base", |b| {
        b.iter(|| {
            sqrt_price_math::get_amount_1_delta_base(
                black_box(a),
                black_box(b_price),
                black_box(liquidity),
                true,
            )
        })
    });
}

pub fn bench_swap_math(c: &mut Criterion) {
    let current = tick_math::get_sqrt_ratio_at_tick(0).unwrap();
    let target = tick_math::get_sqrt_ratio_at_tick(-60).unwrap();
    let remaining = I256::try_from(10i64.pow(12)).unwrap();

    c.bench_function("compute_swap_step", |b| {
        b.iter(|| {
            swap_math::compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(10u128.pow(18)),
                black_box(remaining),
                3000,
            )
        })
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let a = U256::MAX >> 1;
    let b = U256::from(10u64.pow(18));
    let d = U256::MAX >> 3;
    c.bench_function("mul_div", |bench| {
        bench.iter(|| math_helpers::mul_div(black_box(a), black_box(b), black_box(d)))
    });
    c.bench_function("mul_div_rounding_up", |bench| {
        bench.iter(|| math_helpers::mul_div_rounding_up(black_box(a), black_box(b), black_box(d)))
    });
    c.bench_function("add_delta", |bench| {
        bench.iter(|| liquidity_math::add_delta(black_box(1_000_000), black_box(-500)))
    });
}

pub fn bench_tick_bitmap(c: &mut Criterion) {
    let mut bitmap = FastMap::default();
    for tick in ladder_ticks() {
        tick_bitmap::flip_tick(&mut bitmap, tick.index, 60).unwrap();
    }
    c.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| {
            tick_bitmap::next_initialized_tick_within_one_word(
                black_box(&bitmap),
                black_box(30),
                60,
                true,
            )
        })
    });
}

pub fn bench_bit_math(c: &mut Criterion) {
    let x = U256::from(1u8) << 173;
    c.bench_function("most_significant_bit", |b| {
        b.iter(|| bit_math::most_significant_bit(black_box(x)))
    });
    c.bench_function("least_significant_bit", |b| {
        b.iter(|| bit_math::least_significant_bit(black_box(x)))
    });
}

pub fn bench_swap(c: &mut Criterion) {
    let list_pool = ladder_pool();
    let bitmap_pool = bitmap_pool();
    let small = SwapParams::exact_input(true, U256::from(10u64.pow(9))).unwrap();
    let deep = SwapParams::exact_input(false, U256::from(10u64.pow(14))).unwrap();

    c.bench_function("swap_tick_list_single_step", |b| {
        b.iter(|| list_pool.swap(black_box(small)))
    });
    c.bench_function("swap_tick_list_many_crossings", |b| {
        b.iter(|| list_pool.swap(black_box(deep)))
    });
    c.bench_function("swap_bitmap_many_crossings", |b| {
        b.iter(|| bitmap_pool.swap(black_box(deep)))
    });
}

pub fn bench_quotes(c: &mut Criterion) {
    let pool = ladder_pool();
    let input = TokenAmount::new(usdc(), U256::from(10u64.pow(12)));
    let output = TokenAmount::new(weth(), U256::from(10u64.pow(12)));

    c.bench_function("get_output_amount", |b| {
        b.iter(|| pool.get_output_amount(black_box(&input), None))
    });
    c.bench_function("get_input_amount", |b| {
        b.iter(|| pool.get_input_amount(black_box(&output), None))
    });
}
