//! Seed-backed, self-amplifying byte stream.
//!
//! # Architecture
//!
//! ```text
//! seed ──► buffer[0..seed_len] ─┬─► read(n) ──► typed readers
//!                               │
//!   SHA-512(seed ‖ counter_be) ─┘  (appended on demand, 64 bytes per round)
//! ```
//!
//! The buffer is append-only. Amplification hashes the original seed bytes
//! plus a big-endian round counter, never the grown buffer, so every appended
//! block is a function of the seed alone: interleaving reads and growth cannot
//! change what future reads return.

use sha2::{Digest, Sha512};

use crate::error::Result;
use crate::randomness::Randomness;
use crate::seed::seed_from_hex;

/// Bytes appended by one amplification round.
pub const AMPLIFICATION_BLOCK: usize = 64;

/// Deterministic byte source derived from a caller-supplied seed.
///
/// Single-owner: every read advances the cursor, so concurrent callers must
/// each hold their own stream or serialize access.
#[derive(Clone)]
pub struct EntropyStream {
    buffer: Vec<u8>,
    cursor: usize,
    seed_length: usize,
    amplification_count: u64,
}

impl EntropyStream {
    /// Create a stream over `seed`. An empty seed is allowed; the first read
    /// then comes straight from amplification.
    pub fn new(seed: impl Into<Vec<u8>>) -> Self {
        let buffer = seed.into();
        Self {
            seed_length: buffer.len(),
            buffer,
            cursor: 0,
            amplification_count: 0,
        }
    }

    /// Create a stream from a hex-encoded seed (an optional `0x` prefix and
    /// surrounding whitespace are ignored).
    pub fn from_hex(text: &str) -> Result<Self> {
        Ok(Self::new(seed_from_hex(text)?))
    }

    /// Return the next `n` bytes, amplifying first if fewer remain.
    pub fn read(&mut self, n: usize) -> &[u8] {
        self.need(n);
        let start = self.cursor;
        self.cursor += n;
        &self.buffer[start..self.cursor]
    }

    /// Unread bytes currently buffered.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Offset of the next unread byte.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total buffered bytes (seed plus amplified blocks).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The original seed bytes.
    pub fn seed(&self) -> &[u8] {
        &self.buffer[..self.seed_length]
    }

    pub fn seed_length(&self) -> usize {
        self.seed_length
    }

    /// Number of amplification rounds performed so far.
    pub fn amplification_count(&self) -> u64 {
        self.amplification_count
    }

    fn need(&mut self, n: usize) {
        while self.remaining() < n {
            self.amplify();
        }
    }

    fn amplify(&mut self) {
        self.amplification_count += 1;
        let mut h = Sha512::new();
        h.update(&self.buffer[..self.seed_length]);
        h.update(self.amplification_count.to_be_bytes());
        let digest = h.finalize();
        self.buffer.extend_from_slice(&digest);
        log::trace!(
            "amplified entropy stream: round {}, {} bytes buffered",
            self.amplification_count,
            self.buffer.len()
        );
    }
}

impl Randomness for EntropyStream {
    fn bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.read(n).to_vec())
    }
}

// The seed is a secret until it is revealed; keep it out of debug output.
impl std::fmt::Debug for EntropyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntropyStream")
            .field("seed_length", &self.seed_length)
            .field("cursor", &self.cursor)
            .field("len", &self.buffer.len())
            .field("amplification_count", &self.amplification_count)
            .finish()
    }
}
