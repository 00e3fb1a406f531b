//! Seed construction helpers: typed value encoding, SHA-256 commitments,
//! exact fractional seeds and hex conversion.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::error::{DrawError, Result};

/// Length of a commitment or beta string.
pub const SEED_WIDTH: usize = 32;

/// A typed value that encodes to a fixed byte layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedValue {
    /// A single zero byte.
    Null,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
    Text(String),
    /// Homogeneous scalars, encoded element by element.
    Seq(Vec<SeedValue>),
}

impl SeedValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "str",
            Self::Seq(_) => "sequence",
        }
    }

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Null => buf.push(0),
            Self::U8(v) => buf.push(*v),
            Self::U16(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::U32(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::U64(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::I8(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::I16(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::I32(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::I64(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Self::F32(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Self::F64(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Self::Bytes(v) => buf.extend_from_slice(v),
            Self::Text(v) => buf.extend_from_slice(v.as_bytes()),
            Self::Seq(elements) => {
                let Some(first) = elements.first() else {
                    return Ok(());
                };
                for element in elements {
                    if matches!(element, Self::Seq(_) | Self::Null)
                        || std::mem::discriminant(element) != std::mem::discriminant(first)
                    {
                        return Err(DrawError::UnsupportedType(format!(
                            "sequence of {} cannot hold {}",
                            first.type_name(),
                            element.type_name()
                        )));
                    }
                    element.encode_into(buf)?;
                }
            }
        }
        Ok(())
    }
}

macro_rules! seed_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SeedValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

seed_value_from! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    String => Text,
    &str => Text,
}

impl<T: Into<SeedValue>> From<Option<T>> for SeedValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for SeedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::U8(v) => write!(f, "u8:{v}"),
            Self::U16(v) => write!(f, "u16:{v}"),
            Self::U32(v) => write!(f, "u32:{v}"),
            Self::U64(v) => write!(f, "u64:{v}"),
            Self::I8(v) => write!(f, "i8:{v}"),
            Self::I16(v) => write!(f, "i16:{v}"),
            Self::I32(v) => write!(f, "i32:{v}"),
            Self::I64(v) => write!(f, "i64:{v}"),
            Self::F32(v) => write!(f, "f32:{v}"),
            Self::F64(v) => write!(f, "f64:{v}"),
            Self::Bytes(v) => write!(f, "hex:{}", hex::encode(v)),
            Self::Text(v) => write!(f, "str:{v}"),
            Self::Seq(elements) => {
                let tag = elements.first().map_or("str", Self::type_name);
                write!(f, "{tag}[]:")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let text = element.to_string();
                    let body = text.split_once(':').map_or(text.as_str(), |(_, body)| body);
                    f.write_str(body)?;
                }
                Ok(())
            }
        }
    }
}

/// Parses `type:value` tokens such as `u64:0`, `str:hello`, `hex:dead`,
/// `u16[]:1,2,3` or `null`.
impl FromStr for SeedValue {
    type Err = DrawError;

    fn from_str(token: &str) -> Result<Self> {
        if token == "null" {
            return Ok(Self::Null);
        }
        let (tag, body) = token.split_once(':').ok_or_else(|| {
            DrawError::invalid(format!("seed value '{token}' must look like type:value"))
        })?;
        match tag.strip_suffix("[]") {
            Some(element_tag) => {
                if matches!(element_tag, "hex" | "bytes" | "null") {
                    return Err(DrawError::UnsupportedType(format!(
                        "sequences of {element_tag} are not supported"
                    )));
                }
                if body.is_empty() {
                    // Validate the tag even when there is nothing to parse.
                    parse_scalar(element_tag, "0")?;
                    return Ok(Self::Seq(Vec::new()));
                }
                body.split(',')
                    .map(|part| parse_scalar(element_tag, part))
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Seq)
            }
            None => parse_scalar(tag, body),
        }
    }
}

fn parse_scalar(tag: &str, body: &str) -> Result<SeedValue> {
    fn num<T: FromStr>(tag: &str, body: &str) -> Result<T> {
        body.trim()
            .parse()
            .map_err(|_| DrawError::invalid(format!("'{body}' is not a valid {tag}")))
    }

    Ok(match tag {
        "u8" => SeedValue::U8(num(tag, body)?),
        "u16" => SeedValue::U16(num(tag, body)?),
        "u32" => SeedValue::U32(num(tag, body)?),
        "u64" => SeedValue::U64(num(tag, body)?),
        "i8" => SeedValue::I8(num(tag, body)?),
        "i16" => SeedValue::I16(num(tag, body)?),
        "i32" => SeedValue::I32(num(tag, body)?),
        "i64" | "int" => SeedValue::I64(num(tag, body)?),
        "f32" => SeedValue::F32(num(tag, body)?),
        "f64" => SeedValue::F64(num(tag, body)?),
        "str" | "text" => SeedValue::Text(body.to_string()),
        "hex" | "bytes" => SeedValue::Bytes(seed_from_hex(body)?),
        other => {
            return Err(DrawError::UnsupportedType(format!(
                "unknown seed value type '{other}'"
            )));
        }
    })
}

/// Concatenate the encodings of `values`.
pub fn encode_values(values: &[SeedValue]) -> Result<Vec<u8>> {
    if values.is_empty() {
        return Err(DrawError::invalid("no values provided to encode"));
    }
    let mut buf = Vec::new();
    for value in values {
        value.encode_into(&mut buf)?;
    }
    Ok(buf)
}

/// SHA-256 of [`encode_values`]; a 32-byte commitment.
pub fn hash_values(values: &[SeedValue]) -> Result<[u8; SEED_WIDTH]> {
    let digest = Sha256::digest(encode_values(values)?);
    let mut out = [0u8; SEED_WIDTH];
    out.copy_from_slice(&digest);
    Ok(out)
}

/// `i / n` rounded to the nearest 256-bit big-endian fraction (ties round up).
/// `i == n` saturates to all `0xFF`.
///
/// Feeding the result to a stream makes the first `u64` read land at the
/// fraction `i / n` of the probability range, which is handy for exercising
/// selection boundaries.
pub fn beta_string(i: u64, n: u64) -> Result<[u8; SEED_WIDTH]> {
    if n == 0 {
        return Err(DrawError::invalid("denominator cannot be zero"));
    }
    if i > n {
        return Err(DrawError::invalid(format!(
            "numerator {i} cannot be greater than denominator {n}"
        )));
    }
    if i == n {
        return Ok([0xff; SEED_WIDTH]);
    }

    let n = BigUint::from(n);
    let scaled = ((BigUint::from(i) << (SEED_WIDTH * 8)) + (&n >> 1u32)) / n;
    if scaled.bits() > (SEED_WIDTH * 8) as u64 {
        return Ok([0xff; SEED_WIDTH]);
    }
    let digits = scaled.to_bytes_be();
    let mut out = [0u8; SEED_WIDTH];
    out[SEED_WIDTH - digits.len()..].copy_from_slice(&digits);
    Ok(out)
}

/// Decode a hex seed, ignoring surrounding whitespace and a `0x` prefix.
pub fn seed_from_hex(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| DrawError::invalid(format!("invalid hex seed: {e}")))
}

/// Lowercase hex, no prefix.
pub fn seed_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beta_hex(i: u64, n: u64) -> String {
        seed_to_hex(&beta_string(i, n).unwrap())
    }

    #[test]
    fn scalars_encode_big_endian() {
        let bytes = encode_values(&[
            SeedValue::U16(0x0102),
            SeedValue::I8(-1),
            SeedValue::U32(7),
            SeedValue::Null,
        ])
        .unwrap();
        assert_eq!(bytes, vec![0x01, 0x02, 0xff, 0, 0, 0, 7, 0]);
    }

    #[test]
    fn floats_encode_ieee_bits() {
        let bytes = encode_values(&[1.0f64.into(), (-2.0f32).into()]).unwrap();
        assert_eq!(&bytes[..8], &[0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[8..], &[0xc0, 0, 0, 0]);
    }

    #[test]
    fn text_and_bytes_are_verbatim() {
        let bytes = encode_values(&["hi".into(), vec![0xde, 0xad].into()]).unwrap();
        assert_eq!(bytes, b"hi\xde\xad");
    }

    #[test]
    fn sequences_encode_each_element() {
        let seq = SeedValue::Seq(vec![SeedValue::U16(1), SeedValue::U16(2)]);
        assert_eq!(encode_values(&[seq]).unwrap(), vec![0, 1, 0, 2]);
        assert_eq!(
            encode_values(&[SeedValue::Seq(Vec::new()), SeedValue::U8(9)]).unwrap(),
            vec![9]
        );
    }

    #[test]
    fn mixed_or_nested_sequences_are_unsupported() {
        for seq in [
            vec![SeedValue::U16(1), SeedValue::U32(2)],
            vec![SeedValue::Seq(vec![SeedValue::U8(1)])],
            vec![SeedValue::Null],
        ] {
            assert!(matches!(
                encode_values(&[SeedValue::Seq(seq)]),
                Err(DrawError::UnsupportedType(_))
            ));
        }
    }

    #[test]
    fn empty_value_list_is_invalid() {
        assert!(matches!(encode_values(&[]), Err(DrawError::InvalidArgument(_))));
        assert!(matches!(hash_values(&[]), Err(DrawError::InvalidArgument(_))));
    }

    #[test]
    fn hash_of_u64_zero() {
        assert_eq!(
            seed_to_hex(&hash_values(&[SeedValue::U64(0)]).unwrap()),
            "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
        );
    }

    #[test]
    fn hash_of_mixed_values() {
        let values: Vec<SeedValue> = ["u16:1", "u16:2", "str:hi"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(
            seed_to_hex(&hash_values(&values).unwrap()),
            "f9236bad553c4aaf57032ec1a386f69401a02dadf5a5f2c3ec8e3f66121e2ca3"
        );
    }

    #[test]
    fn beta_string_vectors() {
        let zeros = "00".repeat(31);
        assert_eq!(beta_hex(1, 2), format!("80{zeros}"));
        assert_eq!(beta_hex(0, 1), "00".repeat(32));
        assert_eq!(beta_hex(1, 4), format!("40{zeros}"));
        assert_eq!(beta_hex(3, 4), format!("c0{zeros}"));
        assert_eq!(beta_hex(1, 3), "55".repeat(32));
        assert_eq!(beta_hex(2, 3), format!("{}ab", "aa".repeat(31)));
        assert_eq!(beta_hex(1, 6), format!("{}ab", "2a".repeat(31)));
        assert_eq!(beta_hex(1, 1), "ff".repeat(32));
        assert_eq!(beta_hex(1, 256), format!("01{zeros}"));
    }

    #[test]
    fn beta_string_rejects_bad_fractions() {
        assert!(matches!(beta_string(2, 1), Err(DrawError::InvalidArgument(_))));
        assert!(matches!(beta_string(1, 0), Err(DrawError::InvalidArgument(_))));
    }

    #[test]
    fn parses_tokens() {
        assert_eq!("u64:0".parse::<SeedValue>().unwrap(), SeedValue::U64(0));
        assert_eq!("int:-5".parse::<SeedValue>().unwrap(), SeedValue::I64(-5));
        assert_eq!("str:a:b".parse::<SeedValue>().unwrap(), SeedValue::Text("a:b".into()));
        assert_eq!("hex:0xdead".parse::<SeedValue>().unwrap(), SeedValue::Bytes(vec![0xde, 0xad]));
        assert_eq!("null".parse::<SeedValue>().unwrap(), SeedValue::Null);
        assert_eq!(
            "u16[]:1,2,3".parse::<SeedValue>().unwrap(),
            SeedValue::Seq(vec![SeedValue::U16(1), SeedValue::U16(2), SeedValue::U16(3)])
        );
        assert_eq!("f64[]:".parse::<SeedValue>().unwrap(), SeedValue::Seq(Vec::new()));
    }

    #[test]
    fn token_errors() {
        assert!(matches!("u128:1".parse::<SeedValue>(), Err(DrawError::UnsupportedType(_))));
        assert!(matches!("hex[]:ab".parse::<SeedValue>(), Err(DrawError::UnsupportedType(_))));
        assert!(matches!("u8:256".parse::<SeedValue>(), Err(DrawError::InvalidArgument(_))));
        assert!(matches!("u64".parse::<SeedValue>(), Err(DrawError::InvalidArgument(_))));
        assert!(matches!("u16[]:1,x".parse::<SeedValue>(), Err(DrawError::InvalidArgument(_))));
    }

    #[test]
    fn display_parses_back() {
        for token in ["u64:42", "i8:-3", "str:hello", "hex:beef", "null", "u32[]:1,2"] {
            let value: SeedValue = token.parse().unwrap();
            assert_eq!(value.to_string(), token);
        }
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(SeedValue::from(None::<u8>), SeedValue::Null);
        assert_eq!(SeedValue::from(Some(3u8)), SeedValue::U8(3));
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(seed_from_hex("  0XABcd\n").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(seed_from_hex("").unwrap(), Vec::<u8>::new());
        assert!(matches!(seed_from_hex("abc"), Err(DrawError::InvalidArgument(_))));
        assert_eq!(seed_to_hex(&[0, 255]), "00ff");
    }
}
