use fairdraw_core::{Randomness, count_from_signed};
use serde_json::json;

use super::{CliError, Output, SeedArgs};

/// Size an extractor for `count` draws of `magnitude` and read them all at
/// `read_magnitude` (defaults to `magnitude`).
pub fn execute(
    seed: &SeedArgs,
    count: i64,
    magnitude: u64,
    read_magnitude: Option<u64>,
) -> Result<Output, CliError> {
    let count = count_from_signed(count, "numbers")?;
    let mut stream = seed.stream()?;
    let mut extractor = stream.numbers(count, magnitude)?;
    let values = extractor.read_many(count, read_magnitude.unwrap_or(magnitude))?;
    log::debug!(
        "extracted {count} numbers at {} bits per draw from {} stream bytes",
        extractor.bits_per_draw(),
        stream.cursor()
    );

    let text = values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Output::new(json!(values), text))
}
