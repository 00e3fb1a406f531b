//! # fairdraw-core
//!
//! **Verifiable draws from a committed seed.**
//!
//! `fairdraw-core` turns a caller-supplied seed into an unbounded,
//! reproducible stream of typed random values: integers, floats,
//! probabilities, bias-free bounded integers, distinct samples and weighted
//! selections over items with finite or unbounded supply. The same seed and
//! the same sequence of calls always produce the same results, so anyone who
//! learns the seed can replay and audit a draw.
//!
//! ## Quick Start
//!
//! ```
//! use fairdraw_core::{BaseItem, EntropyStream, Randomness, SelectionConfig};
//!
//! let mut stream = EntropyStream::new(b"round-42".to_vec());
//!
//! // Six dice, duplicates allowed
//! let dice = stream.pick(6, 6).unwrap();
//! assert!(dice.iter().all(|&d| d < 6));
//!
//! // Three winners out of a hundred tickets
//! let winners = stream.pick_distinct(3, 100).unwrap();
//! assert_eq!(winners.len(), 3);
//!
//! // Two prizes from a weighted catalog
//! let prizes = [BaseItem::weighted_finite(2.0, 1), BaseItem::finite(3)];
//! let mut config = SelectionConfig::new(&prizes, 2);
//! let results = stream.selection(&mut config).unwrap();
//! assert_eq!(results.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! Seed → [`EntropyStream`] (SHA-512 amplification) → [`Randomness`] readers
//! → [`NumberExtractor`] / sampler / selection
//!
//! Every draw operation is a default method of the [`Randomness`] trait, so
//! any byte source implementing [`Randomness::bytes`] gets the full set.
//! Seeds for tests and audits are built with [`encode_values`],
//! [`hash_values`] and [`beta_string`].

pub mod bits;
pub mod error;
pub mod item;
pub mod numbers;
pub mod probability;
pub mod randomness;
pub mod sampler;
pub mod seed;
pub mod selection;
pub mod stream;

pub use bits::BitView;
pub use error::{DrawError, Result, count_from_signed};
pub use item::{BaseItem, GenericItem, Item, Supply};
pub use numbers::{NumberExtractor, bits_per_draw, numbers_needs};
pub use probability::u64_to_probability;
pub use randomness::Randomness;
pub use seed::{SeedValue, beta_string, encode_values, hash_values, seed_from_hex, seed_to_hex};
pub use selection::{ItemState, SelectionConfig, SelectionResult};
pub use stream::{AMPLIFICATION_BLOCK, EntropyStream};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
