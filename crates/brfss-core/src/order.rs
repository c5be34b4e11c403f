//! Canonical display orders for categorical group keys.
//!
//! Aggregation results are sorted by a caller-chosen order rather than by
//! insertion order, so that repeated queries and side-by-side comparisons
//! always render in the same meaningful sequence.

use std::cmp::Ordering;

/// The seven native age groups, youngest first.
pub const AGE_GROUPS_FINE: &[&str] =
  &["18-24", "25-34", "35-44", "45-54", "55-64", "65-74", "75+"];

/// The three coarse age buckets, youngest first.
pub const AGE_GROUPS_COARSE: &[&str] = &["18-34", "35-64", "65+"];

/// Education attainment levels, lowest first.
pub const EDUCATION_LEVELS: &[&str] = &[
  "Less than H.S.",
  "H.S. or G.E.D.",
  "Some post-H.S.",
  "College graduate",
];

/// A fixed ranking of labels. Labels not in the list sort after every listed
/// label, in lexical order among themselves.
#[derive(Debug, Clone, Copy)]
pub struct CategoryOrder {
  labels: &'static [&'static str],
}

impl CategoryOrder {
  pub const fn new(labels: &'static [&'static str]) -> Self { Self { labels } }

  /// Plain lexical ordering.
  pub const fn lexical() -> Self { Self { labels: &[] } }

  pub const fn age_fine() -> Self { Self::new(AGE_GROUPS_FINE) }

  pub const fn age_coarse() -> Self { Self::new(AGE_GROUPS_COARSE) }

  pub const fn education() -> Self { Self::new(EDUCATION_LEVELS) }

  /// The listed labels, in rank order.
  pub fn labels(&self) -> &'static [&'static str] { self.labels }

  /// Position of `label` in the canonical list, or the list length when it is
  /// not listed.
  pub fn rank(&self, label: &str) -> usize {
    self
      .labels
      .iter()
      .position(|l| *l == label)
      .unwrap_or(self.labels.len())
  }

  pub fn compare(&self, a: &str, b: &str) -> Ordering {
    self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b))
  }
}
