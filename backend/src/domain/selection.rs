//! Shared selection helpers: weighted random pick, uniform seed pick, and
//! locale-fallback label resolution.
//!
//! These are pure functions over their inputs; all randomness comes from the
//! caller-supplied `Rng` so tests can seed a `StdRng` and replay draws.

use rand::Rng;
use std::collections::HashMap;

/// Capability trait for weighted random selection.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl<T: Weighted> Weighted for &T {
    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// Weighted random selection: draw uniformly in `[0, total_weight)` and walk
/// the items in order, subtracting each weight; the item where the remainder
/// first drops to zero or below is selected.
///
/// Returns `None` only for an empty slice. If floating-point rounding leaves
/// the walk exhausted, the last item is returned, so selection never fails
/// on non-empty input. Weights are strictly positive by the catalog
/// invariant; that is enforced upstream, not here.
pub fn weighted_pick<'a, T: Weighted>(items: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let total: f64 = items.iter().map(|item| item.weight()).sum();
    let mut remaining = rng.gen_range(0.0..total);
    for item in items {
        remaining -= item.weight();
        if remaining <= 0.0 {
            return Some(item);
        }
    }
    items.last()
}

/// Uniform pick from a pool of seed strings; an empty pool yields `""`.
pub fn pick_seed<'a>(pool: &'a [String], rng: &mut impl Rng) -> &'a str {
    if pool.is_empty() {
        ""
    } else {
        &pool[rng.gen_range(0..pool.len())]
    }
}

/// Resolve a display label from a localized label map.
///
/// Walks `locale_chain` in order and returns the first label present;
/// `fallback` (normally the raw key) is returned when no locale matches.
pub fn resolve_label<'a>(
    labels: &'a HashMap<String, String>,
    locale_chain: &[&str],
    fallback: &'a str,
) -> &'a str {
    for locale in locale_chain {
        if let Some(label) = labels.get(*locale) {
            return label;
        }
    }
    fallback
}
