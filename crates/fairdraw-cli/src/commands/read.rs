use clap::ValueEnum;
use fairdraw_core::{EntropyStream, Randomness, count_from_signed, seed_to_hex};
use serde_json::{Value, json};

use super::{CliError, Output, SeedArgs};

/// Typed reads available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReadKind {
    Probability,
    Bits,
    Bytes,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

/// `repeat` reads of `kind`; `count` is the length for bits and bytes.
pub fn execute(seed: &SeedArgs, kind: ReadKind, count: i64, repeat: i64) -> Result<Output, CliError> {
    let repeat = count_from_signed(repeat, "reads")?;
    let count = match kind {
        ReadKind::Bits => count_from_signed(count, "bits")?,
        ReadKind::Bytes => count_from_signed(count, "bytes")?,
        _ => 0,
    };

    let mut stream = seed.stream()?;
    let mut values = Vec::with_capacity(repeat);
    let mut lines = Vec::with_capacity(repeat);
    for _ in 0..repeat {
        let (value, line) = read_one(&mut stream, kind, count)?;
        values.push(value);
        lines.push(line);
    }
    log::debug!("read {repeat} x {kind:?}, cursor now {}", stream.cursor());
    Ok(Output::new(Value::Array(values), lines.join("\n")))
}

fn read_one(stream: &mut EntropyStream, kind: ReadKind, count: usize) -> Result<(Value, String), CliError> {
    Ok(match kind {
        ReadKind::Probability => float(stream.probability()?),
        ReadKind::Bits => {
            let bits: String = stream
                .bits(count)?
                .as_slice()
                .iter()
                .map(|&b| if b { '1' } else { '0' })
                .collect();
            (json!(bits), bits)
        }
        ReadKind::Bytes => {
            let hex = seed_to_hex(&stream.bytes(count)?);
            (json!(hex), hex)
        }
        ReadKind::U8 => integer(stream.uint8()?),
        ReadKind::U16 => integer(stream.uint16()?),
        ReadKind::U32 => integer(stream.uint32()?),
        ReadKind::U64 => integer(stream.uint64()?),
        ReadKind::I8 => integer(stream.int8()?),
        ReadKind::I16 => integer(stream.int16()?),
        ReadKind::I32 => integer(stream.int32()?),
        ReadKind::I64 => integer(stream.int64()?),
        ReadKind::F32 => float(f64::from(stream.float32()?)),
        ReadKind::F64 => float(stream.float64()?),
    })
}

fn integer<T: Into<Value> + std::fmt::Display + Copy>(v: T) -> (Value, String) {
    (v.into(), v.to_string())
}

// Non-finite floats have no JSON number form.
fn float(v: f64) -> (Value, String) {
    let value = if v.is_finite() { json!(v) } else { json!(v.to_string()) };
    (value, v.to_string())
}
