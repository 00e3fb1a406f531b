use clap::Subcommand;
use fairdraw_core::{SeedValue, beta_string, encode_values, hash_values, seed_to_hex};
use serde_json::json;

use super::{CliError, Output};

#[derive(Debug, Clone, Subcommand)]
pub enum SeedAction {
    /// Concatenate typed values (e.g. u64:7 str:round-1 u16[]:1,2 null) into seed bytes
    Encode {
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// SHA-256 commitment of the encoded values
    Hash {
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// 32-byte seed whose leading bits encode the fraction I/N
    Beta { i: u64, n: u64 },
}

pub fn execute(action: &SeedAction) -> Result<Output, CliError> {
    let hex = match action {
        SeedAction::Encode { tokens } => seed_to_hex(&encode_values(&parse_tokens(tokens)?)?),
        SeedAction::Hash { tokens } => seed_to_hex(&hash_values(&parse_tokens(tokens)?)?),
        SeedAction::Beta { i, n } => seed_to_hex(&beta_string(*i, *n)?),
    };
    Ok(Output::new(json!(hex), hex))
}

fn parse_tokens(tokens: &[String]) -> Result<Vec<SeedValue>, CliError> {
    tokens
        .iter()
        .map(|t| t.parse::<SeedValue>().map_err(CliError::from))
        .collect()
}
