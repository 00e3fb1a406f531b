//! Goodness-of-fit checks for auditing draw output.
//!
//! Bounded integers, distinct samples and weighted selections are only fair
//! if their observed frequencies match the intended distribution. Each check
//! returns a [`TestResult`] with a p-value (where applicable), a pass/fail
//! determination, and a letter grade (A through F).

use statrs::distribution::{ChiSquared, ContinuousCDF};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }

    fn from_check(name: &str, passed: bool, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            p_value: None,
            statistic,
            details,
            grade: if passed { 'A' } else { 'F' },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimum expected observations per bucket for the chi-squared
/// approximation to hold.
pub const MIN_EXPECTED_PER_BUCKET: f64 = 5.0;

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, details: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: {details}"),
        grade: 'F',
    }
}

/// Tally `samples` into `magnitude` buckets. Out-of-range samples are
/// dropped; [`range_check`] reports them.
pub fn bucket_counts(samples: &[u64], magnitude: usize) -> Vec<u64> {
    let mut counts = vec![0u64; magnitude];
    for &s in samples {
        if let Some(slot) = usize::try_from(s).ok().and_then(|i| counts.get_mut(i)) {
            *slot += 1;
        }
    }
    counts
}

fn chi_squared_sf(statistic: f64, df: f64) -> Option<f64> {
    ChiSquared::new(df).ok().map(|dist| dist.sf(statistic))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Checks
// ═══════════════════════════════════════════════════════════════════════════════

/// Chi-squared goodness of fit of bucket `counts` against a uniform
/// distribution.
pub fn chi_squared_uniformity(counts: &[u64]) -> TestResult {
    let name = "Chi-Squared Uniformity";
    let k = counts.len();
    if k < 2 {
        return insufficient(name, format!("need at least 2 buckets, got {k}"));
    }
    let expected = vec![1.0 / k as f64; k];
    let mut result = chi_squared_expected(counts, &expected);
    result.name = name.to_string();
    result
}

/// Chi-squared goodness of fit of `counts` against arbitrary expected
/// proportions. `expected_probabilities` is normalized before use.
pub fn chi_squared_expected(counts: &[u64], expected_probabilities: &[f64]) -> TestResult {
    let name = "Chi-Squared Goodness of Fit";
    let k = counts.len();
    if k != expected_probabilities.len() {
        return TestResult::from_check(
            name,
            false,
            0.0,
            format!(
                "{k} observed buckets but {} expected proportions",
                expected_probabilities.len()
            ),
        );
    }
    if k < 2 {
        return insufficient(name, format!("need at least 2 buckets, got {k}"));
    }
    let mass: f64 = expected_probabilities.iter().sum();
    if mass.is_nan() || mass <= 0.0 || expected_probabilities.iter().any(|&p| p.is_nan() || p < 0.0) {
        return TestResult::from_check(
            name,
            false,
            0.0,
            "expected proportions must be non-negative with positive sum".to_string(),
        );
    }

    let n: u64 = counts.iter().sum();
    let min_expected = expected_probabilities
        .iter()
        .map(|&p| n as f64 * p / mass)
        .fold(f64::INFINITY, f64::min);
    if min_expected < MIN_EXPECTED_PER_BUCKET {
        return insufficient(
            name,
            format!("smallest expected bucket is {min_expected:.2}, need {MIN_EXPECTED_PER_BUCKET}"),
        );
    }

    let chi2: f64 = counts
        .iter()
        .zip(expected_probabilities)
        .map(|(&c, &p)| {
            let e = n as f64 * p / mass;
            let diff = c as f64 - e;
            diff * diff / e
        })
        .sum();
    let df = (k - 1) as f64;
    match chi_squared_sf(chi2, df) {
        Some(p) => TestResult::from_p(name, p, chi2, format!("n={n}, buckets={k}, df={df}")),
        None => TestResult::from_check(name, false, chi2, format!("invalid df={df}")),
    }
}

/// Whether `observed / total` lies within a relative `tolerance` of
/// `expected`.
pub fn proportion_within(observed: u64, total: u64, expected: f64, tolerance: f64) -> TestResult {
    let name = "Proportion";
    if total == 0 {
        return insufficient(name, "no trials".to_string());
    }
    let actual = observed as f64 / total as f64;
    let deviation = if expected == 0.0 {
        actual
    } else {
        ((actual - expected) / expected).abs()
    };
    TestResult::from_check(
        name,
        deviation <= tolerance,
        deviation,
        format!(
            "observed {observed}/{total} = {actual:.4}, expected {expected:.4}, \
             relative deviation {deviation:.4} (tolerance {tolerance})"
        ),
    )
}

/// Every sample lies in `[0, magnitude)`.
pub fn range_check(samples: &[u64], magnitude: u64) -> TestResult {
    let name = "Range";
    let out_of_range = samples.iter().filter(|&&s| s >= magnitude).count();
    TestResult::from_check(
        name,
        out_of_range == 0,
        out_of_range as f64,
        format!("{out_of_range} of {} samples outside [0, {magnitude})", samples.len()),
    )
}

/// No bucket strays more than five standard deviations from the mean.
pub fn bucket_spread(counts: &[u64]) -> TestResult {
    let name = "Bucket Spread";
    let k = counts.len();
    if k < 2 {
        return insufficient(name, format!("need at least 2 buckets, got {k}"));
    }
    let n: u64 = counts.iter().sum();
    let expected = n as f64 / k as f64;
    if expected < MIN_EXPECTED_PER_BUCKET {
        return insufficient(
            name,
            format!("{expected:.2} expected per bucket, need {MIN_EXPECTED_PER_BUCKET}"),
        );
    }
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    let sd = (expected * (1.0 - 1.0 / k as f64)).sqrt();
    let worst = (max as f64 - expected).abs().max((expected - min as f64).abs()) / sd;
    TestResult::from_check(
        name,
        worst <= 5.0,
        worst,
        format!("min={min}, max={max}, expected={expected:.1}, worst deviation {worst:.2} sd"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Range, chi-squared uniformity and bucket spread over `samples` drawn
/// from `[0, magnitude)`.
pub fn run_uniformity_battery(samples: &[u64], magnitude: u64) -> Vec<TestResult> {
    let range = range_check(samples, magnitude);
    let Ok(buckets) = usize::try_from(magnitude) else {
        return vec![
            range,
            insufficient("Chi-Squared Uniformity", format!("{magnitude} buckets")),
        ];
    };
    let counts = bucket_counts(samples, buckets);
    vec![range, chi_squared_uniformity(&counts), bucket_spread(&counts)]
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
