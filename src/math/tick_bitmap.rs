use crate::FastMap;
use crate::U256_1;
use crate::error::{Error, TickError};
use crate::math::bit_math::{least_significant_bit, most_significant_bit};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use alloy_primitives::U256;

/// Largest spacing the pool factory accepts. Word boundaries stay well
/// inside `i32` up to this value.
pub const MAX_TICK_SPACING: i32 = 16383;

/// Rejects spacings outside `1..=MAX_TICK_SPACING`.
#[inline]
pub fn check_tick_spacing(tick_spacing: i32) -> Result<(), TickError> {
    if tick_spacing <= 0 {
        return Err(TickError::ZeroTickSpacing);
    }
    if tick_spacing > MAX_TICK_SPACING {
        return Err(TickError::TickSpacingTooLarge(tick_spacing));
    }
    Ok(())
}

/// Maps a compressed tick (`tick / tick_spacing`) to its `(word, bit)`
/// coordinates in the tick bitmap.
#[inline]
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xff) as u8)
}

/// Rounds `tick / tick_spacing` towards negative infinity.
#[inline]
pub fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Returns the bitmap word stored at `word`, or zero if absent.
#[inline]
pub fn get_word(bitmap: &FastMap<i16, U256>, word: i16) -> U256 {
    bitmap.get(&word).copied().unwrap_or_default()
}

/// Toggles the initialized flag of `tick`, which must be a multiple of
/// `tick_spacing`. Words that become empty are removed.
pub fn flip_tick(
    bitmap: &mut FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
) -> Result<(), TickError> {
    check_tick_spacing(tick_spacing)?;
    if tick % tick_spacing != 0 {
        return Err(TickError::NotAligned { tick, tick_spacing });
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let word = get_word(bitmap, word_pos) ^ (U256_1 << bit_pos);
    if word.is_zero() {
        bitmap.remove(&word_pos);
    } else {
        bitmap.insert(word_pos, word);
    }
    Ok(())
}

/// Searches the 256-bit word containing `tick` for the next initialized
/// tick to the left (`lte`, current tick included) or strictly to the
/// right.
///
/// Returns the found tick and `true`, or the word boundary and `false`
/// when the rest of the word is empty.
pub fn next_initialized_tick_within_one_word(
    bitmap: &FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Result<(i32, bool), Error> {
    check_tick_spacing(tick_spacing)?;
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);
        // all the 1s at or to the right of the current bit_pos
        let mask = (U256_1 << bit_pos) - U256_1 + (U256_1 << bit_pos);
        let masked = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            (compressed - (bit_pos - most_significant_bit(masked)?) as i32) * tick_spacing
        } else {
            (compressed - bit_pos as i32) * tick_spacing
        };
        Ok((next, initialized))
    } else {
        // start from the word of the next tick, the current one is not a candidate
        let (word_pos, bit_pos) = position(compressed + 1);
        let mask = !((U256_1 << bit_pos) - U256_1);
        let masked = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            (compressed + 1 + (least_significant_bit(masked)? - bit_pos) as i32) * tick_spacing
        } else {
            (compressed + 1 + (u8::MAX - bit_pos) as i32) * tick_spacing
        };
        Ok((next, initialized))
    }
}

/// Word positions to scan from the word containing `tick`, walking
/// `words` further words in the swap direction and stopping at the words
/// that hold `MIN_TICK` / `MAX_TICK`.
///
/// The current word always comes first.
pub fn search_word_range(
    tick: i32,
    tick_spacing: i32,
    zero_for_one: bool,
    words: u16,
) -> Result<Vec<i16>, TickError> {
    check_tick_spacing(tick_spacing)?;
    let (current, _) = position(compress(tick, tick_spacing));

    let range: Vec<i16> = if zero_for_one {
        let (min_word, _) = position(compress(MIN_TICK, tick_spacing));
        let lowest = (current as i32 - words as i32).max(min_word as i32) as i16;
        (lowest..=current).rev().collect()
    } else {
        let (max_word, _) = position(compress(MAX_TICK, tick_spacing));
        let highest = (current as i32 + words as i32).min(max_word as i32) as i16;
        (current..=highest).collect()
    };
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_ticks() -> FastMap<i16, U256> {
        let ticks = [-200, -55, -4, 70, 78, 84, 139, 240, 535];
        let mut bitmap = FastMap::default();
        for t in ticks {
            flip_tick(&mut bitmap, t, 1).unwrap();
        }
        bitmap
    }

    fn is_initialized(bitmap: &FastMap<i16, U256>, tick: i32) -> bool {
        let (next, initialized) = next_initialized_tick_within_one_word(bitmap, tick, 1, true).unwrap();
        next == tick && initialized
    }

    #[test]
    fn position_simple() {
        assert_eq!(position(0), (0, 0));
        assert_eq!(position(1), (0, 1));
        assert_eq!(position(255), (0, 255));
        assert_eq!(position(256), (1, 0));
        assert_eq!(position(300), (1, 44));
    }

    #[test]
    fn position_negative() {
        assert_eq!(position(-1), (-1, 255));
        assert_eq!(position(-256), (-1, 0));
        assert_eq!(position(-257), (-2, 255));
    }

    #[test]
    fn compress_rounds_towards_negative_infinity() {
        assert_eq!(compress(-5, 10), -1);
        assert_eq!(compress(-10, 10), -1);
        assert_eq!(compress(-11, 10), -2);
        assert_eq!(compress(19, 10), 1);
    }

    #[test]
    fn flip_tick_roundtrip() {
        let mut bm = FastMap::default();
        flip_tick(&mut bm, 78, 1).unwrap();
        let (word, bit) = position(78);
        assert_eq!(get_word(&bm, word), U256_1 << bit);
        assert!(is_initialized(&bm, 78));

        flip_tick(&mut bm, 78, 1).unwrap();
        assert_eq!(get_word(&bm, word), U256::ZERO);
        assert!(bm.is_empty());
    }

    #[test]
    fn flip_tick_only_touches_target_tick() {
        let mut bm = FastMap::default();
        flip_tick(&mut bm, -230, 1).unwrap();
        assert!(is_initialized(&bm, -230));
        assert!(!is_initialized(&bm, -231));
        assert!(!is_initialized(&bm, -229));
        assert!(!is_initialized(&bm, -230 + 256));
        assert!(!is_initialized(&bm, -230 - 256));
    }

    #[test]
    fn flip_tick_rejects_unaligned_tick() {
        let mut bm = FastMap::default();
        assert_eq!(
            flip_tick(&mut bm, 61, 60),
            Err(TickError::NotAligned {
                tick: 61,
                tick_spacing: 60
            })
        );
        assert_eq!(flip_tick(&mut bm, 60, 0), Err(TickError::ZeroTickSpacing));
    }

    #[test]
    fn right_exact_match_returns_next_tick() {
        let bm = init_test_ticks();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 78, 1, false).unwrap(),
            (84, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, -55, 1, false).unwrap(),
            (-4, true)
        );
    }

    #[test]
    fn right_between_ticks() {
        let bm = init_test_ticks();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 77, 1, false).unwrap(),
            (78, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, -56, 1, false).unwrap(),
            (-55, true)
        );
    }

    #[test]
    fn right_stops_at_word_boundary() {
        let bm = init_test_ticks();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 255, 1, false).unwrap(),
            (511, false)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, -257, 1, false).unwrap(),
            (-200, true)
        );
    }

    #[test]
    fn right_finds_tick_in_next_word() {
        let mut bm = init_test_ticks();
        flip_tick(&mut bm, 340, 1).unwrap();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 328, 1, false).unwrap(),
            (340, true)
        );
    }

    #[test]
    fn left_includes_current_tick() {
        let bm = init_test_ticks();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 78, 1, true).unwrap(),
            (78, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 79, 1, true).unwrap(),
            (78, true)
        );
    }

    #[test]
    fn left_stops_at_word_boundary() {
        let bm = init_test_ticks();
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 258, 1, true).unwrap(),
            (256, false)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 256, 1, true).unwrap(),
            (256, false)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 72, 1, true).unwrap(),
            (70, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, -257, 1, true).unwrap(),
            (-512, false)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 1023, 1, true).unwrap(),
            (768, false)
        );
    }

    #[test]
    fn search_honours_tick_spacing() {
        let mut bm = FastMap::default();
        for t in [-120, 60, 120] {
            flip_tick(&mut bm, t, 60).unwrap();
        }
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 0, 60, false).unwrap(),
            (60, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, -1, 60, true).unwrap(),
            (-120, true)
        );
        assert_eq!(
            next_initialized_tick_within_one_word(&bm, 130, 60, false).unwrap(),
            (255 * 60, false)
        );
    }

    #[test]
    fn tick_spacing_bounds() {
        assert_eq!(check_tick_spacing(1), Ok(()));
        assert_eq!(check_tick_spacing(MAX_TICK_SPACING), Ok(()));
        assert_eq!(check_tick_spacing(-60), Err(TickError::ZeroTickSpacing));
        assert_eq!(
            check_tick_spacing(MAX_TICK_SPACING + 1),
            Err(TickError::TickSpacingTooLarge(16384))
        );
        let mut bitmap = FastMap::default();
        assert_eq!(
            flip_tick(&mut bitmap, 0, 1 << 20),
            Err(TickError::TickSpacingTooLarge(1 << 20))
        );
    }

    #[test]
    fn search_word_range_walks_in_swap_direction() {
        assert_eq!(search_word_range(13, 10, false, 2).unwrap(), vec![0, 1, 2]);
        assert_eq!(search_word_range(-1, 10, true, 2).unwrap(), vec![-1, -2, -3]);
        assert_eq!(search_word_range(0, 10, true, 0).unwrap(), vec![0]);
    }

    #[test]
    fn search_word_range_clamps_to_global_words() {
        // MAX_TICK / 10 lives in word 346
        assert_eq!(
            search_word_range(887270, 10, false, 4).unwrap(),
            vec![346]
        );
        assert_eq!(
            search_word_range(-887270, 10, true, 4).unwrap(),
            vec![-347]
        );
        assert_eq!(
            search_word_range(0, 0, true, 1),
            Err(TickError::ZeroTickSpacing)
        );
    }
}
