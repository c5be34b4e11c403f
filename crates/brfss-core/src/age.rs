//! Age-bucket coarsening: seven native age groups to three broad buckets.

use crate::order::AGE_GROUPS_COARSE;

const COARSE_MAP: &[(&str, &str)] = &[
  ("18-24", "18-34"),
  ("25-34", "18-34"),
  ("35-44", "35-64"),
  ("45-54", "35-64"),
  ("55-64", "35-64"),
  ("65-74", "65+"),
  ("75+", "65+"),
];

/// Map a native age label to its coarse bucket.
///
/// Labels outside the known seven pass through unchanged as their own
/// singleton group and are logged.
pub fn coarsen_age(label: &str) -> &str {
  match COARSE_MAP.iter().find(|(fine, _)| *fine == label) {
    Some((_, coarse)) => *coarse,
    None => {
      tracing::warn!(label, "unexpected age group label; keeping it as its own bucket");
      label
    }
  }
}

/// Whether `label` is one of the three coarse buckets.
pub fn is_coarse_bucket(label: &str) -> bool { AGE_GROUPS_COARSE.contains(&label) }
