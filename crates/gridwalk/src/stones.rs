//! Engraved stones that change on every blink.
//!
//! Each blink replaces every stone by the first matching rule:
//! `0` becomes `1`; a number with an even count of digits splits into its
//! left and right halves; anything else is multiplied by 2024. Order is kept
//! but never affects the count, so [`count_after`] tracks how many stones
//! carry each number instead of the full row.

use std::collections::HashMap;

use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use crate::error::{Error, Result};

const MULTIPLIER: u64 = 2024;

/// Space-separated stone numbers on the first non-blank line.
pub fn parse_stones<I, S>(lines: I) -> Result<Vec<u64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        return line
            .split_whitespace()
            .map(|token| {
                token.parse::<u64>().map_err(|_| {
                    Error::format(index + 1, format!("invalid stone {:?}", token))
                })
            })
            .collect();
    }
    Err(Error::format(1, "no stones"))
}

fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}

/// What one stone turns into after a single blink.
pub fn blink_stone(stone: u64) -> Result<SmallVec<[u64; 2]>> {
    if stone == 0 {
        return Ok(smallvec![1]);
    }
    let digits = digit_count(stone);
    if digits % 2 == 0 {
        let half = 10u64.pow(digits / 2);
        return Ok(smallvec![stone / half, stone % half]);
    }
    stone
        .checked_mul(MULTIPLIER)
        .map(|value| smallvec![value])
        .ok_or(Error::Overflow { value: stone })
}

/// The full row after one blink.
pub fn blink(stones: &[u64]) -> Result<Vec<u64>> {
    let mut next = Vec::with_capacity(stones.len() * 2);
    for &stone in stones {
        next.extend(blink_stone(stone)?);
    }
    Ok(next)
}

/// Number of stones after `blinks` blinks.
pub fn count_after(stones: &[u64], blinks: usize) -> Result<u64> {
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for &stone in stones {
        *counts.entry(stone).or_default() += 1;
    }

    for round in 0..blinks {
        let mut next: HashMap<u64, u64> = HashMap::with_capacity(counts.len());
        for (&stone, &count) in &counts {
            for child in blink_stone(stone)? {
                let entry = next.entry(child).or_default();
                *entry = entry.saturating_add(count);
            }
        }
        counts = next;
        trace!("blink {}: {} distinct numbers", round + 1, counts.len());
    }

    let total = counts
        .values()
        .fold(0u64, |total, &count| total.saturating_add(count));
    debug!("{} stones after {} blinks", total, blinks);
    Ok(total)
}
