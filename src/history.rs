//! Append-only swap-rate history.
//!
//! Points are keyed by `(tenor, observed_at, source)`; re-inserting an existing
//! key is ignored (first write wins). The scorer only reads the ascending window
//! for a tenor, so the book hands out plain slices-as-vectors and never mutates
//! an existing observation.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};

use crate::domain::{SwapHistoryPoint, Tenor};

#[derive(Debug, Clone, Default)]
pub struct SwapHistoryBook {
    series: HashMap<Tenor, BTreeMap<(DateTime<Utc>, String), f64>>,
}

impl SwapHistoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from raw points, dropping duplicates and non-finite values.
    pub fn from_points(points: impl IntoIterator<Item = SwapHistoryPoint>) -> Self {
        let mut book = Self::new();
        let mut duplicates = 0usize;
        for point in points {
            if !point.value.is_finite() {
                tracing::warn!(
                    tenor = %point.tenor,
                    observed_at = %point.observed_at,
                    "dropping non-finite swap observation"
                );
                continue;
            }
            if !book.insert(point) {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            tracing::debug!(duplicates, "ignored duplicate swap observations");
        }
        book
    }

    /// Append a point. Returns `false` if the key was already present.
    pub fn insert(&mut self, point: SwapHistoryPoint) -> bool {
        let series = self.series.entry(point.tenor).or_default();
        let key = (point.observed_at, point.source);
        if series.contains_key(&key) {
            return false;
        }
        series.insert(key, point.value);
        true
    }

    pub fn len(&self) -> usize {
        self.series.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending points for `tenor` with `as_of - days <= observed_at <= as_of`.
    pub fn window(&self, tenor: Tenor, as_of: DateTime<Utc>, days: i64) -> Vec<SwapHistoryPoint> {
        let Some(series) = self.series.get(&tenor) else {
            return Vec::new();
        };
        let start = Duration::try_days(days)
            .and_then(|span| as_of.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        series
            .iter()
            .filter(|((at, _), _)| *at >= start && *at <= as_of)
            .map(|((at, source), value)| SwapHistoryPoint {
                observed_at: *at,
                tenor,
                value: *value,
                source: source.clone(),
            })
            .collect()
    }
}
