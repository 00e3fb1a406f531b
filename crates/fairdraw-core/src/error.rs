//! Error type shared by every draw operation.

use thiserror::Error;

/// Everything that can go wrong while deriving values from a seed.
///
/// Errors are returned to the immediate caller and never retried internally.
/// None of them leave a [`SelectionConfig`](crate::SelectionConfig) partially
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Negative count, zero magnitude, zero count, bad weight, malformed token.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `pick_distinct` asked for more values than the range holds.
    #[error("cannot pick {requested} distinct numbers from a range of only {available} numbers")]
    RangeExceeded { requested: usize, available: u64 },

    /// A number extractor was asked for a value above its configured magnitude.
    #[error("magnitude {requested} exceeds the extractor's magnitude {limit}")]
    MagnitudeTooLarge { requested: u64, limit: u64 },

    /// A number extractor was read more often than it was sized for.
    #[error("out of numbers: extractor was sized for {max_draws} draws")]
    OutOfNumbers { max_draws: usize },

    /// Every item is finite and their combined supply is below the requested count.
    #[error("total supply ({supply}) is less than requested count ({requested})")]
    InsufficientSupply { supply: u64, requested: usize },

    /// No item has remaining weighted availability.
    #[error("no items remaining with non-zero supply")]
    Exhausted,

    /// Selection bookkeeping disagrees with itself. Indicates a bug.
    #[error("selection invariant violated: {0}")]
    InvariantViolation(String),

    /// The seed encoder was handed a value type it cannot serialize.
    #[error("unsupported value type: {0}")]
    UnsupportedType(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DrawError>;

impl DrawError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Convert a signed count received from a host environment into a `usize`.
///
/// Host bindings pass counts as signed integers; a negative value is an
/// [`DrawError::InvalidArgument`]. `what` names the quantity in the message.
pub fn count_from_signed(n: i64, what: &str) -> Result<usize> {
    if n < 0 {
        return Err(DrawError::invalid(format!(
            "cannot generate {n} {what}: count must be non-negative"
        )));
    }
    usize::try_from(n)
        .map_err(|_| DrawError::invalid(format!("{what} count {n} does not fit this platform")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_count_is_invalid() {
        let err = count_from_signed(-1, "bytes").unwrap_err();
        assert!(matches!(err, DrawError::InvalidArgument(_)));
        assert!(err.to_string().contains("-1 bytes"));
    }

    #[test]
    fn non_negative_count_passes_through() {
        assert_eq!(count_from_signed(0, "bits").unwrap(), 0);
        assert_eq!(count_from_signed(17, "bits").unwrap(), 17);
    }

    #[test]
    fn messages_name_the_limits() {
        let err = DrawError::RangeExceeded {
            requested: 11,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "cannot pick 11 distinct numbers from a range of only 10 numbers"
        );
        let err = DrawError::InsufficientSupply {
            supply: 3,
            requested: 4,
        };
        assert_eq!(err.to_string(), "total supply (3) is less than requested count (4)");
    }
}
