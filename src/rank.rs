//! Ordering of frequency tables for "top N" listings.

use std::cmp::Ordering;
use std::collections::HashMap;

/// All entries by decreasing value, equal values ordered by label.
pub fn ranked<V>(map: &HashMap<String, V>) -> Vec<(&str, V)>
where
    V: Copy + PartialOrd,
{
    let mut entries: Vec<(&str, V)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|(la, va), (lb, vb)| {
        vb.partial_cmp(va)
            .unwrap_or(Ordering::Equal)
            .then_with(|| la.cmp(lb))
    });
    entries
}

/// The first `n` entries of [`ranked`].
pub fn top<V>(map: &HashMap<String, V>, n: usize) -> Vec<(&str, V)>
where
    V: Copy + PartialOrd,
{
    let mut entries = ranked(map);
    entries.truncate(n);
    entries
}
