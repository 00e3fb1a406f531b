//! Exact mapping from a raw 64-bit draw to a probability in (0.0, 1.0].
//!
//! A plain `u as f64 / u64::MAX as f64` rounds twice and collapses small
//! inputs to exactly 0.0. Here the quotient `u / (2^64 - 1)` plus the smallest
//! positive `f64` (2^-1074) is formed as an exact rational and rounded once,
//! to nearest with ties to even, so the result is never 0.0 and only reaches
//! 1.0 when the exact quotient rounds there.

use num_bigint::BigUint;

/// Exponent of the smallest positive subnormal `f64` (2^-1074).
const MIN_SUBNORMAL_EXP: usize = 1074;
/// Exponent of the smallest positive normal `f64` (2^-1022).
const MIN_NORMAL_EXP: i64 = -1022;
/// Explicit mantissa bits of an `f64`.
const MANTISSA_BITS: i64 = 52;

/// Map `u` to `u / u64::MAX + 2^-1074`, correctly rounded to `f64`.
pub fn u64_to_probability(u: u64) -> f64 {
    // u / D + 2^-1074 == (u * 2^1074 + D) / (D * 2^1074)
    let d = BigUint::from(u64::MAX);
    let num = (BigUint::from(u) << MIN_SUBNORMAL_EXP) + &d;
    let den = d << MIN_SUBNORMAL_EXP;
    ratio_to_f64(&num, &den)
}

/// Round the positive rational `num / den` to the nearest `f64`.
///
/// Plain `BigUint` shifts and one division are enough for a single correctly
/// rounded step, so no rational number type is needed.
///
/// Handles subnormal results. Returns `f64::INFINITY` on overflow and 0.0
/// for a zero numerator.
pub(crate) fn ratio_to_f64(num: &BigUint, den: &BigUint) -> f64 {
    if num.bits() == 0 {
        return 0.0;
    }

    // Find exp with 2^exp <= num/den < 2^(exp+1).
    let mut exp = num.bits() as i64 - den.bits() as i64;
    if scaled(num, den, exp) == std::cmp::Ordering::Less {
        exp -= 1;
    }
    if exp > 1023 {
        return f64::INFINITY;
    }

    // Scale so the integer quotient holds the significand: 53 bits for
    // normals, fewer for subnormals (fixed 2^-1074 quantum).
    let shift = if exp < MIN_NORMAL_EXP {
        MIN_SUBNORMAL_EXP as i64
    } else {
        MANTISSA_BITS - exp
    };
    let (n, d) = if shift >= 0 {
        (num << shift as usize, den.clone())
    } else {
        (num.clone(), den << (-shift) as usize)
    };
    let q = &n / &d;
    let r = &n % &d;
    let mut mantissa = low_u64(&q);

    let twice_r: BigUint = r << 1usize;
    let round_up = match twice_r.cmp(&d) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => mantissa & 1 == 1,
        std::cmp::Ordering::Less => false,
    };
    if round_up {
        mantissa += 1;
    }

    if exp < MIN_NORMAL_EXP {
        // Subnormal bit pattern is the mantissa itself; a carry into bit 52
        // lands exactly on the smallest normal encoding.
        return f64::from_bits(mantissa);
    }
    if mantissa == 1u64 << (MANTISSA_BITS + 1) {
        mantissa >>= 1;
        exp += 1;
        if exp > 1023 {
            return f64::INFINITY;
        }
    }
    let biased = (exp + 1023) as u64;
    f64::from_bits((biased << MANTISSA_BITS) | (mantissa & ((1u64 << MANTISSA_BITS) - 1)))
}

/// Compare `num / den` against `2^exp`.
fn scaled(num: &BigUint, den: &BigUint, exp: i64) -> std::cmp::Ordering {
    if exp >= 0 {
        num.cmp(&(den << exp as usize))
    } else {
        (num << (-exp) as usize).cmp(den)
    }
}

fn low_u64(n: &BigUint) -> u64 {
    n.iter_u64_digits().next().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_smallest_positive() {
        let p = u64_to_probability(0);
        assert!(p > 0.0);
        assert_eq!(p, f64::from_bits(1));
    }

    #[test]
    fn max_maps_to_one() {
        assert_eq!(u64_to_probability(u64::MAX), 1.0);
    }

    #[test]
    fn stays_inside_unit_interval() {
        for u in [1u64, 2, 1 << 11, 1 << 32, u64::MAX / 3, u64::MAX - 1] {
            let p = u64_to_probability(u);
            assert!(p > 0.0 && p <= 1.0, "u={u} p={p}");
        }
    }

    #[test]
    fn tracks_plain_division_closely() {
        for u in [1u64, 12345, 1 << 40, u64::MAX / 2, u64::MAX / 7 * 5] {
            let exact = u64_to_probability(u);
            let naive = u as f64 / u64::MAX as f64;
            assert!((exact - naive).abs() <= naive * 1e-15, "u={u}");
        }
    }

    #[test]
    fn half_is_exact() {
        // 2^63 / (2^64 - 1) sits a hair above 0.5, well inside half an ulp.
        assert_eq!(u64_to_probability(u64::MAX / 2 + 1), 0.5);
    }

    #[test]
    fn monotone_in_input() {
        let mut prev = 0.0;
        for k in 0..64u32 {
            let p = u64_to_probability(1u64 << k);
            assert!(p > prev);
            prev = p;
        }
    }

    #[test]
    fn ratio_to_f64_handles_simple_fractions() {
        let r = |a: u64, b: u64| ratio_to_f64(&BigUint::from(a), &BigUint::from(b));
        assert_eq!(r(1, 2), 0.5);
        assert_eq!(r(1, 3), 1.0 / 3.0);
        assert_eq!(r(2, 3), 2.0 / 3.0);
        assert_eq!(r(3, 1), 3.0);
        assert_eq!(r(0, 5), 0.0);
        assert_eq!(r(1, 10), 0.1);
    }

    #[test]
    fn ratio_to_f64_handles_subnormals() {
        let one = BigUint::from(1u32);
        assert_eq!(ratio_to_f64(&one, &(BigUint::from(1u32) << 1074usize)), f64::from_bits(1));
        assert_eq!(ratio_to_f64(&one, &(BigUint::from(1u32) << 1022usize)), f64::MIN_POSITIVE);
        // 2^-1076 is a quarter of the smallest subnormal and rounds to zero.
        assert_eq!(ratio_to_f64(&one, &(BigUint::from(1u32) << 1076usize)), 0.0);
    }
}
