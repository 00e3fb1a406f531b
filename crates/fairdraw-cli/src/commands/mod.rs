pub mod audit;
pub mod numbers;
pub mod pick;
pub mod read;
pub mod seed;
pub mod select;

use clap::Args;
use fairdraw_core::{DrawError, EntropyStream};
use serde_json::{Value, json};
use thiserror::Error;

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// What a command produced: a JSON value and its human-readable rendering.
#[derive(Debug)]
pub struct Output {
    pub value: Value,
    pub text: String,
}

impl Output {
    pub fn new(value: Value, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }
}

/// Seed selection shared by every draw command.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct SeedArgs {
    /// Seed as hex (an optional 0x prefix is ignored)
    #[arg(long)]
    pub seed: Option<String>,

    /// Seed as raw UTF-8 text
    #[arg(long)]
    pub seed_text: Option<String>,
}

impl SeedArgs {
    #[cfg(test)]
    pub fn hex(seed: &str) -> Self {
        Self {
            seed: Some(seed.to_string()),
            seed_text: None,
        }
    }

    #[cfg(test)]
    pub fn text(seed: &str) -> Self {
        Self {
            seed: None,
            seed_text: Some(seed.to_string()),
        }
    }

    pub fn stream(&self) -> Result<EntropyStream, CliError> {
        let stream = match (&self.seed, &self.seed_text) {
            (Some(hex), _) => EntropyStream::from_hex(hex)?,
            (None, Some(text)) => EntropyStream::new(text.as_bytes()),
            (None, None) => {
                return Err(CliError::Usage(
                    "one of --seed or --seed-text is required".to_string(),
                ));
            }
        };
        log::debug!("seeded stream with {} bytes", stream.seed_length());
        Ok(stream)
    }
}

/// The `{"value": …, "err": …}` result shape host bindings return.
pub fn envelope(result: &Result<Output, CliError>) -> Value {
    match result {
        Ok(output) => json!({ "value": output.value, "err": Value::Null }),
        Err(e) => json!({ "value": Value::Null, "err": e.to_string() }),
    }
}

/// Print a command result and return the process exit code.
pub fn emit(result: Result<Output, CliError>, as_json: bool) -> i32 {
    if as_json {
        println!("{}", envelope(&result));
        return i32::from(result.is_err());
    }
    match result {
        Ok(output) => {
            println!("{}", output.text);
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}
