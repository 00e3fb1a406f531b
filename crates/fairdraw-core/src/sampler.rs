//! Uniform sampling with and without replacement.

use crate::error::{DrawError, Result};
use crate::randomness::Randomness;

/// `n` integers in `[0, magnitude)`, duplicates allowed.
///
/// `n == 0` returns an empty vector without touching the source.
pub fn pick<R: Randomness + ?Sized>(rng: &mut R, n: usize, magnitude: u64) -> Result<Vec<u64>> {
    check_magnitude(magnitude)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut numbers = rng.numbers(n, magnitude)?;
    numbers.read_many(n, magnitude)
}

/// `n` distinct integers in `[0, magnitude)`, in draw order.
///
/// Each step draws a position within the ordered list of values not yet
/// taken and takes the value there, so neither end of the range is favoured.
/// Only the taken values are stored, so memory grows with `n` and not with
/// `magnitude`; each step costs `O(n)`.
pub fn pick_distinct<R: Randomness + ?Sized>(
    rng: &mut R,
    n: usize,
    magnitude: u64,
) -> Result<Vec<u64>> {
    check_magnitude(magnitude)?;
    if n as u64 > magnitude {
        return Err(DrawError::RangeExceeded {
            requested: n,
            available: magnitude,
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut numbers = rng.numbers(n, magnitude)?;
    let mut taken: Vec<u64> = Vec::with_capacity(n);
    let mut selected = Vec::with_capacity(n);
    for remaining in (magnitude - n as u64 + 1..=magnitude).rev() {
        let pos = numbers.read(remaining)?;
        let value = nth_untaken(&taken, pos);
        let slot = taken.partition_point(|&t| t < value);
        taken.insert(slot, value);
        selected.push(value);
    }
    Ok(selected)
}

/// The `pos`-th value (0-based) of `0..` that is absent from sorted `taken`.
fn nth_untaken(taken: &[u64], pos: u64) -> u64 {
    let mut value = pos;
    for &t in taken {
        if t > value {
            break;
        }
        value += 1;
    }
    value
}

fn check_magnitude(magnitude: u64) -> Result<()> {
    if magnitude == 0 {
        return Err(DrawError::invalid(
            "cannot generate numbers in range [0, 0): magnitude must be positive",
        ));
    }
    Ok(())
}
