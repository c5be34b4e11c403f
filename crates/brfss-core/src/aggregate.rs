//! The aggregator: recompute proportions and 95% intervals from raw counts.
//!
//! Pre-computed percentages cannot be averaged across rows with different
//! sample sizes, so every group's estimate is derived from the summed
//! `sample_size` and `persons` of its rows using the normal approximation to
//! the binomial.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Two-sided 95% critical value of the standard normal distribution.
pub const Z_95: f64 = 1.96;

// ─── Result types ────────────────────────────────────────────────────────────

/// A proportion with its normal-approximation interval, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
  pub proportion:     f64,
  pub standard_error: f64,
  pub ci_low:         f64,
  pub ci_high:        f64,
}

impl Interval {
  /// Compute the interval for `persons` out of `sample_size`.
  ///
  /// `sample_size` must be non-zero and `persons <= sample_size`.
  fn from_counts(sample_size: u64, persons: u64) -> Self {
    let n = sample_size as f64;
    let p = persons as f64 / n;
    let standard_error = (p * (1.0 - p) / n).sqrt();
    Self {
      proportion: p,
      standard_error,
      ci_low: (p - Z_95 * standard_error).max(0.0),
      ci_high: (p + Z_95 * standard_error).min(1.0),
    }
  }
}

/// The outcome of aggregating one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
  /// The group's combined sample size is zero; there is nothing to report.
  InsufficientData,
  Interval(Interval),
}

/// Summed counts and the derived estimate for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
  pub total_sample_size: u64,
  pub total_persons:     u64,
  pub estimate:          Estimate,
}

impl AggregateResult {
  /// Derive the estimate for already-sanitised totals.
  pub fn from_totals(total_sample_size: u64, total_persons: u64) -> Self {
    let estimate = if total_sample_size == 0 {
      Estimate::InsufficientData
    } else {
      Estimate::Interval(Interval::from_counts(
        total_sample_size,
        total_persons.min(total_sample_size),
      ))
    };
    Self { total_sample_size, total_persons, estimate }
  }

  /// The sentinel emitted for a group without any rows.
  pub fn insufficient() -> Self { Self::from_totals(0, 0) }

  pub fn interval(&self) -> Option<&Interval> {
    match &self.estimate {
      Estimate::Interval(i) => Some(i),
      Estimate::InsufficientData => None,
    }
  }

  pub fn proportion(&self) -> Option<f64> {
    self.interval().map(|i| i.proportion)
  }

  pub fn is_insufficient(&self) -> bool {
    matches!(self.estimate, Estimate::InsufficientData)
  }
}

/// One aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<K> {
  pub key:    K,
  #[serde(flatten)]
  pub result: AggregateResult,
}

/// Ordered groups produced by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation<K> {
  groups: Vec<Group<K>>,
}

impl<K> Aggregation<K> {
  pub fn groups(&self) -> &[Group<K>] { &self.groups }

  pub fn into_groups(self) -> Vec<Group<K>> { self.groups }

  pub fn iter(&self) -> std::slice::Iter<'_, Group<K>> { self.groups.iter() }

  pub fn len(&self) -> usize { self.groups.len() }

  pub fn is_empty(&self) -> bool { self.groups.is_empty() }

  /// Look up a group by key.
  pub fn get(&self, key: &K) -> Option<&AggregateResult>
  where
    K: PartialEq,
  {
    self.groups.iter().find(|g| &g.key == key).map(|g| &g.result)
  }

  /// Sum of `(sample_size, persons)` across all groups.
  pub fn totals(&self) -> (u64, u64) {
    self.groups.iter().fold((0, 0), |(n, x), g| {
      (
        n.saturating_add(g.result.total_sample_size),
        x.saturating_add(g.result.total_persons),
      )
    })
  }

  /// Emit an insufficient-data group for every expected key that had no rows,
  /// then restore the canonical order.
  pub fn fill_missing<I, C>(mut self, expected: I, mut compare: C) -> Self
  where
    I: IntoIterator<Item = K>,
    K: PartialEq,
    C: FnMut(&K, &K) -> Ordering,
  {
    for key in expected {
      if !self.groups.iter().any(|g| g.key == key) {
        self.groups.push(Group { key, result: AggregateResult::insufficient() });
      }
    }
    self.groups.sort_by(|a, b| compare(&a.key, &b.key));
    self
  }
}

impl<'a, K> IntoIterator for &'a Aggregation<K> {
  type IntoIter = std::slice::Iter<'a, Group<K>>;
  type Item = &'a Group<K>;

  fn into_iter(self) -> Self::IntoIter { self.groups.iter() }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Partition `records` by `group_key`, sum their counts, and derive one
/// [`AggregateResult`] per group, ordered by `compare`.
///
/// Missing or negative counts contribute zero, and `persons` is capped at the
/// row's `sample_size`; both corrections are logged at `warn`.
pub fn aggregate<'a, K, I, F, C>(
  records: I,
  mut group_key: F,
  mut compare: C,
) -> Aggregation<K>
where
  I: IntoIterator<Item = &'a Record>,
  F: FnMut(&Record) -> K,
  K: Ord,
  C: FnMut(&K, &K) -> Ordering,
{
  let mut partitions: BTreeMap<K, (u64, u64)> = BTreeMap::new();
  for record in records {
    let (n, x) = sanitized_counts(record);
    let entry = partitions.entry(group_key(record)).or_default();
    // Saturate rather than wrap on absurd counts from malformed input.
    entry.0 = entry.0.saturating_add(n);
    entry.1 = entry.1.saturating_add(x);
  }

  let mut groups: Vec<Group<K>> = partitions
    .into_iter()
    .map(|(key, (n, x))| Group { key, result: AggregateResult::from_totals(n, x) })
    .collect();
  // Stable sort: keys the comparator considers equal keep their natural order.
  groups.sort_by(|a, b| compare(&a.key, &b.key));

  Aggregation { groups }
}

/// Clamp a record's counts into a usable `(sample_size, persons)` pair.
fn sanitized_counts(record: &Record) -> (u64, u64) {
  let sample_size = sanitize_count(record, "sample_size", record.sample_size);
  let persons = sanitize_count(record, "persons", record.persons);
  if persons > sample_size {
    tracing::warn!(
      question = %record.question,
      response = %record.response,
      breakout = %record.breakout_value,
      sample_size,
      persons,
      "persons exceeds sample_size; capping persons"
    );
    return (sample_size, sample_size);
  }
  (sample_size, persons)
}

fn sanitize_count(record: &Record, field: &'static str, value: Option<i64>) -> u64 {
  match value {
    Some(v) if v >= 0 => v as u64,
    Some(v) => {
      tracing::warn!(
        question = %record.question,
        response = %record.response,
        breakout = %record.breakout_value,
        field,
        value = v,
        "negative count treated as zero"
      );
      0
    }
    None => {
      tracing::warn!(
        question = %record.question,
        response = %record.response,
        breakout = %record.breakout_value,
        field,
        "missing count treated as zero"
      );
      0
    }
  }
}
