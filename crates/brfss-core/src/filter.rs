//! Explicit record filtering.
//!
//! Filters borrow from the loaded snapshot; no record is ever copied or
//! mutated by a query.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Keep the records matching `predicate`, in their original order.
pub fn filter<'a, I, P>(records: I, mut predicate: P) -> Vec<&'a Record>
where
  I: IntoIterator<Item = &'a Record>,
  P: FnMut(&Record) -> bool,
{
  records.into_iter().filter(|&r| predicate(r)).collect()
}

/// A Class → Topic → Question choice identifying one survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
  pub class:    String,
  pub topic:    String,
  pub question: String,
}

impl Selection {
  pub fn new(
    class: impl Into<String>,
    topic: impl Into<String>,
    question: impl Into<String>,
  ) -> Self {
    Self { class: class.into(), topic: topic.into(), question: question.into() }
  }

  pub fn matches(&self, record: &Record) -> bool {
    record.class == self.class
      && record.topic == self.topic
      && record.question == self.question
  }
}
