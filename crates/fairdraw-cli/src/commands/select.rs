use std::path::Path;

use fairdraw_core::{GenericItem, Item, Randomness, SelectionConfig, SelectionResult};
use serde_json::{Value, json};

use super::{CliError, Output, SeedArgs};

/// A catalog entry read from an items file: any JSON payload plus optional
/// `weight` (default 1.0) and signed `supply` (default -1, unbounded).
pub type CatalogItem = GenericItem<Value>;

pub struct SelectCommandConfig<'a> {
    pub seed: &'a SeedArgs,
    pub items_path: &'a Path,
    pub count: usize,
    pub rounds: usize,
    pub reset_between: bool,
}

pub fn load_items(path: &Path) -> Result<Vec<CatalogItem>, CliError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: display,
        source,
    })
}

/// Run `rounds` selections of `count` items each against one stream.
///
/// Consumption carries over between rounds unless `reset_between` is set.
pub fn execute(config: SelectCommandConfig<'_>) -> Result<Output, CliError> {
    let items = load_items(config.items_path)?;
    log::debug!("loaded {} catalog items", items.len());
    run_rounds(config.seed, &items, config.count, config.rounds, config.reset_between)
}

pub fn run_rounds(
    seed: &SeedArgs,
    items: &[CatalogItem],
    count: usize,
    rounds: usize,
    reset_between: bool,
) -> Result<Output, CliError> {
    let mut stream = seed.stream()?;
    let mut selection = SelectionConfig::new(items, count);

    let mut all_rounds = Vec::with_capacity(rounds);
    let mut text = Vec::new();
    for round in 1..=rounds {
        if reset_between && round > 1 {
            selection.reset();
        }
        let results = stream.selection(&mut selection)?;
        if rounds > 1 {
            text.push(format!("round {round}:"));
        }
        text.extend(results.iter().map(describe));
        all_rounds.push(Value::Array(results.iter().map(to_json).collect()));
    }

    Ok(Output::new(Value::Array(all_rounds), text.join("\n")))
}

fn to_json(result: &SelectionResult<'_, CatalogItem>) -> Value {
    json!({
        "value": result.get().value,
        "index": result.index(),
        "weight": result.weight(),
        "supply": result.supply().to_signed(),
        "instance": result.instance(),
        "fraction": result.fraction(),
    })
}

fn describe(result: &SelectionResult<'_, CatalogItem>) -> String {
    format!(
        "#{} {} (instance {}, fraction {:.6})",
        result.index(),
        result.get().value,
        result.instance(),
        result.fraction()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairdraw_core::{BaseItem, DrawError};

    fn catalog() -> Vec<CatalogItem> {
        vec![
            GenericItem::new(json!("gold"), BaseItem::single()),
            GenericItem::new(json!("silver"), BaseItem::finite(2)),
        ]
    }

    #[test]
    fn test_one_round_draws_everything() {
        let out = run_rounds(&SeedArgs::text("prizes"), &catalog(), 3, 1, false).unwrap();
        let round = out.value[0].as_array().unwrap();
        assert_eq!(round.len(), 3);
        let golds = round.iter().filter(|r| r["value"] == "gold").count();
        assert_eq!(golds, 1);
        assert!(round.iter().all(|r| r["fraction"].as_f64().unwrap() > 0.0));
    }

    #[test]
    fn test_state_carries_across_rounds() {
        let err = run_rounds(&SeedArgs::text("prizes"), &catalog(), 2, 2, false).unwrap_err();
        assert!(matches!(err, CliError::Draw(DrawError::Exhausted)));
    }

    #[test]
    fn test_reset_between_rounds() {
        let out = run_rounds(&SeedArgs::text("prizes"), &catalog(), 3, 4, true).unwrap();
        assert_eq!(out.value.as_array().unwrap().len(), 4);
        assert!(out.text.contains("round 4:"));
    }

    #[test]
    fn test_signed_supply_in_output() {
        let items = vec![GenericItem::new(json!(1), BaseItem::weighted_infinite(2.0))];
        let out = run_rounds(&SeedArgs::text("inf"), &items, 1, 1, false).unwrap();
        let r = &out.value[0][0];
        assert_eq!(r["supply"], -1);
        assert_eq!(r["weight"], 2.0);
        assert_eq!(r["instance"], 1);
        assert_eq!(r["index"], 0);
    }
}
