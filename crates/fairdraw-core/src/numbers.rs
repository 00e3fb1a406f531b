//! Bias-free extraction of bounded integers from a bit view.
//!
//! A raw `bits mod m` draw favours small remainders whenever `2^bits` is not
//! a multiple of `m`. The extractor instead adds every fixed-width slice into
//! a wrapping `u64` accumulator and reduces the accumulator, so each draw's
//! remainder is blended with the carry of all earlier draws. One priming draw
//! is taken at construction so the first value handed out is never a raw
//! slice of the stream.

use crate::bits::BitView;
use crate::error::{DrawError, Result};
use crate::randomness::Randomness;

/// `ceil(log2(magnitude))`, computed exactly. Zero for magnitudes 0 and 1.
pub fn bits_per_draw(magnitude: u64) -> usize {
    if magnitude <= 1 {
        0
    } else {
        (u64::BITS - (magnitude - 1).leading_zeros()) as usize
    }
}

/// Bits per draw and total bytes needed to serve `count` draws of
/// `magnitude` (plus the priming draw).
pub fn numbers_needs(count: usize, magnitude: u64) -> Result<(usize, usize)> {
    if count == 0 {
        return Err(DrawError::invalid(format!(
            "invalid count {count}: must be positive"
        )));
    }
    if magnitude == 0 {
        return Err(DrawError::invalid(format!(
            "cannot generate numbers in range [0, {magnitude}): magnitude must be positive"
        )));
    }
    let per_draw = bits_per_draw(magnitude);
    let bits_needed = count
        .checked_add(1)
        .and_then(|draws| draws.checked_mul(per_draw))
        .ok_or_else(|| DrawError::invalid(format!("{count} numbers do not fit in memory")))?;
    Ok((per_draw, bits_needed.div_ceil(8)))
}

/// Pull enough bits from `rng` and build an extractor for `count` draws.
pub(crate) fn extract<R: Randomness + ?Sized>(
    rng: &mut R,
    count: usize,
    magnitude: u64,
) -> Result<NumberExtractor> {
    let (per_draw, bytes_needed) = numbers_needs(count, magnitude)?;
    let bits = rng.bits(bytes_needed * 8)?;
    NumberExtractor::new(bits, per_draw, count, magnitude)
}

/// Reads a bounded number of integers in `[0, m)` with `m <= magnitude`.
#[derive(Debug, Clone)]
pub struct NumberExtractor {
    bits: BitView,
    draw_position: usize,
    accumulator: u64,
    bits_per_draw: usize,
    max_draws: usize,
    magnitude: u64,
}

impl NumberExtractor {
    /// Build an extractor and take the priming draw at full `magnitude`.
    pub fn new(
        bits: BitView,
        bits_per_draw: usize,
        max_draws: usize,
        magnitude: u64,
    ) -> Result<Self> {
        let mut extractor = Self {
            bits,
            draw_position: 0,
            accumulator: 0,
            bits_per_draw,
            max_draws,
            magnitude,
        };
        extractor.read(magnitude)?;
        Ok(extractor)
    }

    /// Next value in `[0, m)`.
    pub fn read(&mut self, m: u64) -> Result<u64> {
        if self.draw_position > self.max_draws {
            return Err(DrawError::OutOfNumbers {
                max_draws: self.max_draws,
            });
        }
        if m > self.magnitude {
            return Err(DrawError::MagnitudeTooLarge {
                requested: m,
                limit: self.magnitude,
            });
        }
        if m == 0 {
            return Err(DrawError::invalid("magnitude must be positive"));
        }
        let input = self
            .bits
            .number_at(self.draw_position * self.bits_per_draw, self.bits_per_draw)
            .ok_or(DrawError::OutOfNumbers {
                max_draws: self.max_draws,
            })?;
        self.draw_position += 1;
        self.accumulator = self.accumulator.wrapping_add(input);
        Ok(self.accumulator % m)
    }

    /// `count` sequential reads; stops at the first error.
    pub fn read_many(&mut self, count: usize, m: u64) -> Result<Vec<u64>> {
        (0..count).map(|_| self.read(m)).collect()
    }

    /// Draws taken so far, including the priming draw.
    pub fn draw_position(&self) -> usize {
        self.draw_position
    }

    /// Draws still available to callers.
    pub fn remaining(&self) -> usize {
        (self.max_draws + 1).saturating_sub(self.draw_position)
    }

    pub fn accumulator(&self) -> u64 {
        self.accumulator
    }

    pub fn bits_per_draw(&self) -> usize {
        self.bits_per_draw
    }

    pub fn max_draws(&self) -> usize {
        self.max_draws
    }

    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }
}
