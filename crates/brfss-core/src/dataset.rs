//! [`Dataset`] — the immutable, shared snapshot every query reads from.
//!
//! Built once at startup and never mutated afterwards, so concurrent readers
//! need no synchronisation. Cloning is cheap: the rows are reference-counted.

use std::{collections::BTreeSet, sync::Arc};

use crate::{
  filter::{Selection, filter},
  record::Record,
};

#[derive(Debug, Clone)]
pub struct Dataset {
  records: Arc<[Record]>,
}

impl Dataset {
  pub fn new(records: Vec<Record>) -> Self { Self { records: records.into() } }

  pub fn records(&self) -> &[Record] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Distinct non-empty classes, sorted.
  pub fn classes(&self) -> Vec<String> {
    distinct(self.records.iter().map(|r| r.class.as_str()))
  }

  /// Distinct non-empty topics within `class`, sorted.
  pub fn topics(&self, class: &str) -> Vec<String> {
    distinct(
      self
        .records
        .iter()
        .filter(|r| r.class == class)
        .map(|r| r.topic.as_str()),
    )
  }

  /// Distinct non-empty questions within `class` and `topic`, sorted.
  pub fn questions(&self, class: &str, topic: &str) -> Vec<String> {
    distinct(
      self
        .records
        .iter()
        .filter(|r| r.class == class && r.topic == topic)
        .map(|r| r.question.as_str()),
    )
  }

  /// The first class, its first topic, and that topic's first question.
  /// `None` when the dataset has no usable rows.
  pub fn default_selection(&self) -> Option<Selection> {
    let class = self.classes().into_iter().next()?;
    let topic = self.topics(&class).into_iter().next()?;
    let question = self.questions(&class, &topic).into_iter().next()?;
    Some(Selection { class, topic, question })
  }

  // ── Queries ───────────────────────────────────────────────────────────

  /// Every record for the selected question.
  pub fn select(&self, selection: &Selection) -> Vec<&Record> {
    filter(self.records.iter(), |r| selection.matches(r))
  }
}

impl From<Vec<Record>> for Dataset {
  fn from(records: Vec<Record>) -> Self { Self::new(records) }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  values
    .filter(|v| !v.is_empty())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(str::to_owned)
    .collect()
}
