use fairdraw_core::{EntropyStream, Randomness, SeedValue, hash_values};
use fairdraw_tests::{TestResult, calculate_quality_score, run_uniformity_battery};
use serde_json::{Value, json};

use super::{CliError, Output};

/// Draw `draws` numbers in `[0, magnitude)` from each of `seeds` derived
/// seeds (`hash_values([u64 i])`) and grade the pooled output.
pub fn execute(magnitude: u64, seeds: u64, draws: usize) -> Result<Output, CliError> {
    if seeds == 0 {
        return Err(CliError::Usage("--seeds must be positive".to_string()));
    }

    let mut samples = Vec::new();
    for i in 0..seeds {
        let seed = hash_values(&[SeedValue::U64(i)])?;
        let mut stream = EntropyStream::new(seed.to_vec());
        samples.extend(stream.pick(draws, magnitude)?);
    }
    log::info!("auditing {} samples over magnitude {magnitude}", samples.len());

    let results = run_uniformity_battery(&samples, magnitude);
    let score = calculate_quality_score(&results);

    let value = json!({
        "magnitude": magnitude,
        "seeds": seeds,
        "draws": draws,
        "samples": samples.len(),
        "score": score,
        "results": results.iter().map(result_json).collect::<Vec<_>>(),
    });
    Ok(Output::new(value, render(&results, score, samples.len())))
}

fn result_json(r: &TestResult) -> Value {
    json!({
        "name": r.name,
        "passed": r.passed,
        "p_value": r.p_value,
        "statistic": r.statistic,
        "details": r.details,
        "grade": r.grade.to_string(),
    })
}

fn render(results: &[TestResult], score: f64, samples: usize) -> String {
    let mut lines = vec![
        format!("Audit of {samples} samples"),
        format!("{:<24} {:>5} {:>10}  Details", "Test", "Grade", "p-value"),
        "-".repeat(72),
    ];
    for r in results {
        let p = r
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let mark = if r.passed { "✓" } else { "✗" };
        lines.push(format!(
            "{mark} {:<22} {:>5} {:>10}  {}",
            r.name, r.grade, p, r.details
        ));
    }
    lines.push(format!("Score: {score:.1}/100"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_report() {
        let out = execute(6, 50, 40).unwrap();
        assert_eq!(out.value["samples"], 2000);
        assert_eq!(out.value["results"].as_array().unwrap().len(), 3);
        assert!(out.text.contains("Score:"));
        assert_eq!(out.value["results"][0]["name"], "Range");
        assert_eq!(out.value["results"][0]["passed"], true);
    }

    #[test]
    fn test_zero_seeds_rejected() {
        assert!(matches!(execute(6, 0, 10), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_zero_magnitude_rejected() {
        assert!(execute(0, 3, 10).is_err());
    }
}
