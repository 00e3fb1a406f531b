//! Selectable items: weight, supply and an opaque payload.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// How many times an item can be selected.
///
/// Serialized with the signed convention used by host environments:
/// `N >= 0` is `Finite(N)`, `-M` is `Unbounded(M)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Supply {
    /// `N` consumable instances numbered `1..=N`.
    Finite(u64),
    /// Never consumed; the item's weight is multiplied by the magnitude.
    Unbounded(u64),
}

impl Supply {
    pub fn from_signed(n: i64) -> Self {
        if n < 0 {
            Self::Unbounded(n.unsigned_abs())
        } else {
            Self::Finite(n as u64)
        }
    }

    /// Signed form, saturating at `i64::MAX` / `-i64::MAX`.
    pub fn to_signed(self) -> i64 {
        match self {
            Self::Finite(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Unbounded(m) => -i64::try_from(m).unwrap_or(i64::MAX),
        }
    }

    /// Instance count for finite supplies, weight multiplier for unbounded ones.
    pub fn magnitude(self) -> u64 {
        match self {
            Self::Finite(n) | Self::Unbounded(n) => n,
        }
    }

    pub fn is_consumable(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl From<i64> for Supply {
    fn from(n: i64) -> Self {
        Self::from_signed(n)
    }
}

impl From<Supply> for i64 {
    fn from(supply: Supply) -> Self {
        supply.to_signed()
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unbounded(m) => write!(f, "unbounded(x{m})"),
        }
    }
}

/// The two accessors weighted selection needs from an item.
pub trait Item {
    /// Relative weight of one instance. Must be finite and non-negative.
    fn weight(&self) -> f64;

    fn supply(&self) -> Supply;
}

impl<T: Item + ?Sized> Item for &T {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn supply(&self) -> Supply {
        (**self).supply()
    }
}

impl<T: Item + ?Sized> Item for Box<T> {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn supply(&self) -> Supply {
        (**self).supply()
    }
}

impl<T: Item + ?Sized> Item for Rc<T> {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn supply(&self) -> Supply {
        (**self).supply()
    }
}

impl<T: Item + ?Sized> Item for Arc<T> {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn supply(&self) -> Supply {
        (**self).supply()
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_supply() -> Supply {
    Supply::Unbounded(1)
}

/// Weight and supply with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseItem {
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default = "default_supply")]
    supply: Supply,
}

impl BaseItem {
    pub fn new(weight: f64, supply: Supply) -> Self {
        Self { weight, supply }
    }

    /// Weight 1, one instance.
    pub fn single() -> Self {
        Self::new(1.0, Supply::Finite(1))
    }

    /// Weight 1, never consumed.
    pub fn infinite() -> Self {
        Self::new(1.0, Supply::Unbounded(1))
    }

    /// Weight 1, `supply` instances.
    pub fn finite(supply: u64) -> Self {
        Self::new(1.0, Supply::Finite(supply))
    }

    pub fn weighted_single(weight: f64) -> Self {
        Self::new(weight, Supply::Finite(1))
    }

    pub fn weighted_infinite(weight: f64) -> Self {
        Self::new(weight, Supply::Unbounded(1))
    }

    pub fn weighted_finite(weight: f64, supply: u64) -> Self {
        Self::new(weight, Supply::Finite(supply))
    }
}

impl Default for BaseItem {
    fn default() -> Self {
        Self::new(default_weight(), default_supply())
    }
}

impl Item for BaseItem {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn supply(&self) -> Supply {
        self.supply
    }
}

/// An item carrying a caller-defined payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericItem<T> {
    #[serde(flatten)]
    pub base: BaseItem,
    pub value: T,
}

impl<T> GenericItem<T> {
    pub fn new(value: T, base: BaseItem) -> Self {
        Self { base, value }
    }
}

impl<T> Item for GenericItem<T> {
    fn weight(&self) -> f64 {
        self.base.weight
    }

    fn supply(&self) -> Supply {
        self.base.supply
    }
}
