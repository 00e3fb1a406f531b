//! The `Randomness` facade every draw is written against.
//!
//! Implementors only provide [`Randomness::bytes`]; typed readers, number
//! extraction, sampling and weighted selection are default methods built on
//! top of it. All multi-byte values are read big-endian and consume exactly
//! their width from the source.

use crate::bits::BitView;
use crate::error::{DrawError, Result};
use crate::item::Item;
use crate::numbers::{self, NumberExtractor};
use crate::probability::u64_to_probability;
use crate::sampler;
use crate::selection::{self, SelectionConfig, SelectionResult};

/// A deterministic source of typed random values.
pub trait Randomness {
    /// Return the next `n` raw bytes.
    fn bytes(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Uniform value in (0.0, 1.0], from exactly one `u64` read.
    fn probability(&mut self) -> Result<f64> {
        Ok(u64_to_probability(self.uint64()?))
    }

    /// `n` bits, most significant bit of each byte first. Consumes
    /// `ceil(n / 8)` whole bytes; leftover bits of the last byte are dropped.
    fn bits(&mut self, n: usize) -> Result<BitView> {
        let raw = self.bytes(n.div_ceil(8))?;
        Ok(BitView::from_bytes(&raw, n))
    }

    fn uint64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(read_array(self)?))
    }

    fn uint32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(read_array(self)?))
    }

    fn uint16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(read_array(self)?))
    }

    fn uint8(&mut self) -> Result<u8> {
        Ok(u8::from_be_bytes(read_array(self)?))
    }

    fn int64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(read_array(self)?))
    }

    fn int32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(read_array(self)?))
    }

    fn int16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(read_array(self)?))
    }

    fn int8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(read_array(self)?))
    }

    /// Reinterpret the next 8 bytes as an IEEE-754 double. May yield NaN or
    /// infinities.
    fn float64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.uint64()?))
    }

    /// Reinterpret the next 4 bytes as an IEEE-754 single.
    fn float32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.uint32()?))
    }

    /// A bias-free extractor for `count` numbers in `[0, magnitude)`.
    ///
    /// Values are not unique; use [`Randomness::pick_distinct`] for that.
    fn numbers(&mut self, count: usize, magnitude: u64) -> Result<NumberExtractor> {
        numbers::extract(self, count, magnitude)
    }

    /// `n` integers in `[0, magnitude)`, duplicates allowed.
    fn pick(&mut self, n: usize, magnitude: u64) -> Result<Vec<u64>> {
        sampler::pick(self, n, magnitude)
    }

    /// `n` distinct integers in `[0, magnitude)`.
    fn pick_distinct(&mut self, n: usize, magnitude: u64) -> Result<Vec<u64>> {
        sampler::pick_distinct(self, n, magnitude)
    }

    /// Weighted, supply-aware selection of `config.count()` items.
    fn selection<'a, I: Item>(
        &mut self,
        config: &mut SelectionConfig<'a, I>,
    ) -> Result<Vec<SelectionResult<'a, I>>>
    where
        Self: Sized,
    {
        selection::select(self, config)
    }
}

impl<R: Randomness + ?Sized> Randomness for &mut R {
    fn bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).bytes(n)
    }
}

impl<R: Randomness + ?Sized> Randomness for Box<R> {
    fn bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).bytes(n)
    }
}

fn read_array<const N: usize, R: Randomness + ?Sized>(r: &mut R) -> Result<[u8; N]> {
    let raw = r.bytes(N)?;
    <[u8; N]>::try_from(raw.as_slice()).map_err(|_| {
        DrawError::InvariantViolation(format!(
            "byte source returned {} bytes, expected {N}",
            raw.len()
        ))
    })
}
