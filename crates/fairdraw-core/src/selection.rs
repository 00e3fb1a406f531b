//! Weighted, supply-aware selection.
//!
//! Every unused instance of a finite item is its own selectable unit carrying
//! the item's weight, so mass is split per instance rather than per item.
//! Unbounded items form a single unit weighing `weight × M` and are never
//! consumed.
//!
//! Consumption state lives in the [`SelectionConfig`] and persists across
//! calls until [`SelectionConfig::reset`]. A call either completes every draw
//! or leaves the state exactly as it found it.

use std::collections::BTreeSet;

use crate::error::{DrawError, Result};
use crate::item::{Item, Supply};
use crate::randomness::Randomness;

/// Consumption state of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemState {
    original_supply: u64,
    remaining_supply: u64,
    used_instances: BTreeSet<u64>,
    is_consumable: bool,
}

impl ItemState {
    fn new(supply: Supply) -> Self {
        Self {
            original_supply: supply.magnitude(),
            remaining_supply: supply.magnitude(),
            used_instances: BTreeSet::new(),
            is_consumable: supply.is_consumable(),
        }
    }

    /// Instance count for finite items, weight multiplier for unbounded ones.
    pub fn original_supply(&self) -> u64 {
        self.original_supply
    }

    pub fn remaining_supply(&self) -> u64 {
        self.remaining_supply
    }

    pub fn used_instances(&self) -> &BTreeSet<u64> {
        &self.used_instances
    }

    pub fn is_consumable(&self) -> bool {
        self.is_consumable
    }

    fn unused_instances(&self) -> impl Iterator<Item = u64> + '_ {
        (1..=self.original_supply).filter(|i| !self.used_instances.contains(i))
    }

    fn take_lowest_unused(&mut self) -> Option<u64> {
        let instance = self.unused_instances().next()?;
        self.used_instances.insert(instance);
        self.remaining_supply -= 1;
        Some(instance)
    }

    fn reset(&mut self) {
        self.remaining_supply = self.original_supply;
        self.used_instances.clear();
    }
}

/// The catalog, how many items to draw per call, and the consumption state
/// carried between calls.
#[derive(Debug, Clone)]
pub struct SelectionConfig<'a, I> {
    items: &'a [I],
    count: usize,
    state: Option<Vec<ItemState>>,
}

impl<'a, I: Item> SelectionConfig<'a, I> {
    pub fn new(items: &'a [I], count: usize) -> Self {
        Self {
            items,
            count,
            state: None,
        }
    }

    pub fn items(&self) -> &'a [I] {
        self.items
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Change the per-call draw count. Consumption state is kept.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Per-item state, or `None` before the first selection.
    pub fn states(&self) -> Option<&[ItemState]> {
        self.state.as_deref()
    }

    /// Make every instance selectable again. No effect before the first
    /// selection or on unbounded items.
    pub fn reset(&mut self) {
        if let Some(states) = self.state.as_mut() {
            states.iter_mut().for_each(ItemState::reset);
        }
    }

    /// Check the catalog and count before any draw is taken.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(DrawError::invalid("no items to select from"));
        }
        if self.count == 0 {
            return Err(DrawError::invalid("count must be positive"));
        }

        let mut all_finite = true;
        let mut total_supply: u64 = 0;
        for (index, item) in self.items.iter().enumerate() {
            let weight = item.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(DrawError::invalid(format!(
                    "weights must be finite and non-negative (item {index} has weight {weight})"
                )));
            }
            match item.supply() {
                Supply::Finite(n) => total_supply = total_supply.saturating_add(n),
                Supply::Unbounded(_) => all_finite = false,
            }
        }

        if all_finite && total_supply < self.count as u64 {
            return Err(DrawError::InsufficientSupply {
                supply: total_supply,
                requested: self.count,
            });
        }
        Ok(())
    }

    fn states_mut(&mut self) -> &mut Vec<ItemState> {
        let items = self.items;
        self.state
            .get_or_insert_with(|| items.iter().map(|item| ItemState::new(item.supply())).collect())
    }
}

/// One selected item.
#[derive(Debug)]
pub struct SelectionResult<'a, I> {
    item: &'a I,
    index: usize,
    instance: u64,
    fraction: f64,
}

impl<'a, I> SelectionResult<'a, I> {
    /// The selected catalog entry.
    pub fn get(&self) -> &'a I {
        self.item
    }

    /// Position of the entry in the catalog.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Instance number drawn; always 1 for unbounded items.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Where the probability draw landed inside the selected unit's
    /// sub-interval, in (0, 1].
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl<I> Clone for SelectionResult<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for SelectionResult<'_, I> {}

impl<I: Item> Item for SelectionResult<'_, I> {
    fn weight(&self) -> f64 {
        self.item.weight()
    }

    fn supply(&self) -> Supply {
        self.item.supply()
    }
}

/// Draw `config.count()` items, updating the config's consumption state.
pub fn select<'a, R, I>(
    rng: &mut R,
    config: &mut SelectionConfig<'a, I>,
) -> Result<Vec<SelectionResult<'a, I>>>
where
    R: Randomness + ?Sized,
    I: Item,
{
    config.validate()?;
    let items = config.items;
    let count = config.count;
    let states = config.states_mut();
    let snapshot = states.clone();

    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        match draw(rng, items, states) {
            Ok(result) => results.push(result),
            Err(err) => {
                log::debug!(
                    "selection failed after {} of {count} draws, state rolled back: {err}",
                    results.len()
                );
                *states = snapshot;
                return Err(err);
            }
        }
    }
    log::debug!("selected {count} item(s) from {} catalog entries", items.len());
    Ok(results)
}

fn draw<'a, R, I>(
    rng: &mut R,
    items: &'a [I],
    states: &mut [ItemState],
) -> Result<SelectionResult<'a, I>>
where
    R: Randomness + ?Sized,
    I: Item,
{
    let total = total_weight(items, states);
    if total == 0.0 {
        return Err(DrawError::Exhausted);
    }
    if !total.is_finite() {
        return Err(DrawError::invalid(format!(
            "total weight of available instances is not finite ({total})"
        )));
    }

    let p = rng.probability()?;
    let (index, fraction) = locate(items, states, total, p)?;

    let state = &mut states[index];
    let instance = if state.is_consumable {
        state.take_lowest_unused().ok_or_else(|| {
            DrawError::InvariantViolation(format!("item {index} has no unused instance"))
        })?
    } else {
        1
    };

    Ok(SelectionResult {
        item: &items[index],
        index,
        instance,
        fraction,
    })
}

fn total_weight<I: Item>(items: &[I], states: &[ItemState]) -> f64 {
    let mut total = 0.0;
    for (item, state) in items.iter().zip(states) {
        if !state.is_consumable {
            total += item.weight() * state.original_supply as f64;
        } else if state.remaining_supply > 0 {
            for _ in state.unused_instances() {
                total += item.weight();
            }
        }
    }
    total
}

/// Walk the units in catalog order and return the index of the first whose
/// cumulative normalized mass reaches `p`, with the fraction inside it.
fn locate<I: Item>(items: &[I], states: &[ItemState], total: f64, p: f64) -> Result<(usize, f64)> {
    let mut cumulative = 0.0;
    // (index, unit, cumulative after unit)
    let mut last_positive: Option<(usize, f64, f64)> = None;

    for (index, (item, state)) in items.iter().zip(states).enumerate() {
        if !state.is_consumable {
            let unit = item.weight() * state.original_supply as f64 / total;
            cumulative += unit;
            if unit > 0.0 {
                last_positive = Some((index, unit, cumulative));
            }
            if p <= cumulative {
                return Ok((index, fraction_within(p, cumulative, unit)));
            }
        } else if state.remaining_supply > 0 {
            let unit = item.weight() / total;
            for _ in state.unused_instances() {
                cumulative += unit;
                if unit > 0.0 {
                    last_positive = Some((index, unit, cumulative));
                }
                if p <= cumulative {
                    return Ok((index, fraction_within(p, cumulative, unit)));
                }
            }
        }
    }

    debug_assert!(
        p - cumulative < 1e-9,
        "walked mass {cumulative} is far below draw {p}"
    );
    let (index, unit, end) = last_positive.ok_or_else(|| {
        DrawError::InvariantViolation("no unit has positive mass despite positive total".into())
    })?;
    log::warn!("probability {p} exceeds walked mass {cumulative}; selecting last weighted unit");
    Ok((index, fraction_within(p, end, unit).min(1.0)))
}

fn fraction_within(p: f64, cumulative: f64, unit: f64) -> f64 {
    (p - (cumulative - unit)) / unit
}
