use fairdraw_core::{Randomness, count_from_signed};
use serde_json::json;

use super::{CliError, Output, SeedArgs};

pub fn execute(seed: &SeedArgs, count: i64, magnitude: u64, distinct: bool) -> Result<Output, CliError> {
    let count = count_from_signed(count, "numbers")?;
    let mut stream = seed.stream()?;
    let values = if distinct {
        stream.pick_distinct(count, magnitude)?
    } else {
        stream.pick(count, magnitude)?
    };

    let text = values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Output::new(json!(values), text))
}
