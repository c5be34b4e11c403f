//! Record — one row of the pre-aggregated survey dataset.
//!
//! Records are immutable once loaded. Counts are kept exactly as they were
//! read so that malformed rows stay visible for diagnosis; sanitising them
//! is the aggregator's job.

use serde::{Deserialize, Serialize};

// ─── Breakout categories ─────────────────────────────────────────────────────

/// `Break_Out_Category` value for the whole-population rows.
pub const BREAKOUT_OVERALL: &str = "Overall";
/// `Break_Out_Category` value for the sex breakout.
pub const BREAKOUT_GENDER: &str = "Sex";
/// `Break_Out_Category` value for the age breakout.
pub const BREAKOUT_AGE: &str = "Age Group";
/// `Break_Out_Category` value for the education breakout.
pub const BREAKOUT_EDUCATION: &str = "Education Attained";
/// `Break_Out_Category` value for the household income breakout.
pub const BREAKOUT_INCOME: &str = "Household Income";

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single surveyed response row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  /// Survey year. `None` when the source cell was empty.
  pub year:              Option<i32>,
  /// State or territory abbreviation. `None` when the source cell was empty.
  pub location:          Option<String>,
  pub class:             String,
  pub topic:             String,
  pub question:          String,
  pub response:          String,
  pub breakout_category: String,
  pub breakout_value:    String,
  /// Respondents contributing to this row, as read from the source.
  pub sample_size:       Option<i64>,
  /// Estimated people giving this response, as read from the source.
  pub persons:           Option<i64>,
  /// The row's own response rate in `[0, 1]`.
  pub proportion:        Option<f64>,
  /// Pre-computed interval bounds. Not trusted after aggregation.
  pub reported_ci_low:   Option<f64>,
  pub reported_ci_high:  Option<f64>,
}

impl Record {
  /// Convenience constructor with every optional field unset and empty
  /// identifiers. Chain the `with_*` methods to fill it in.
  pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
    Self {
      year:              None,
      location:          None,
      class:             String::new(),
      topic:             String::new(),
      question:          question.into(),
      response:          response.into(),
      breakout_category: String::new(),
      breakout_value:    String::new(),
      sample_size:       None,
      persons:           None,
      proportion:        None,
      reported_ci_low:   None,
      reported_ci_high:  None,
    }
  }

  pub fn with_class_topic(
    mut self,
    class: impl Into<String>,
    topic: impl Into<String>,
  ) -> Self {
    self.class = class.into();
    self.topic = topic.into();
    self
  }

  pub fn with_breakout(
    mut self,
    category: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.breakout_category = category.into();
    self.breakout_value = value.into();
    self
  }

  /// Set both counts and derive `proportion` from them.
  pub fn with_counts(mut self, sample_size: i64, persons: i64) -> Self {
    self.sample_size = Some(sample_size);
    self.persons = Some(persons);
    self.proportion =
      (sample_size > 0).then(|| persons as f64 / sample_size as f64);
    self
  }

  pub fn with_year(mut self, year: i32) -> Self {
    self.year = Some(year);
    self
  }

  pub fn with_location(mut self, location: impl Into<String>) -> Self {
    self.location = Some(location.into());
    self
  }

  /// Whether this row belongs to the given breakout category.
  pub fn is_breakout(&self, category: &str) -> bool {
    self.breakout_category == category
  }
}
