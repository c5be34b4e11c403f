//! Column names of the source file and explicit cell coercion.
//!
//! Both loaders read cells into a [`RawRow`] of untyped-but-parsed values and
//! convert it to a [`Record`] here, so the CSV and Parquet paths agree on how
//! every column is typed.

use brfss_core::Record;

pub const COL_YEAR: &str = "Year";
pub const COL_LOCATION: &str = "Locationabbr";
pub const COL_CLASS: &str = "Class";
pub const COL_TOPIC: &str = "Topic";
pub const COL_QUESTION: &str = "Question";
pub const COL_RESPONSE: &str = "Response";
pub const COL_BREAKOUT_VALUE: &str = "Break_Out";
pub const COL_BREAKOUT_CATEGORY: &str = "Break_Out_Category";
pub const COL_SAMPLE_SIZE: &str = "Sample_Size";
pub const COL_PERSONS: &str = "persons";
pub const COL_PROPORTION: &str = "proportion";
pub const COL_CI_LOW: &str = "Confidence_limit_Low";
pub const COL_CI_HIGH: &str = "Confidence_limit_High";

/// Every column a record is built from, in [`RawRow`] field order.
pub const REQUIRED_COLUMNS: [&str; 13] = [
  COL_YEAR,
  COL_LOCATION,
  COL_CLASS,
  COL_TOPIC,
  COL_QUESTION,
  COL_RESPONSE,
  COL_BREAKOUT_VALUE,
  COL_BREAKOUT_CATEGORY,
  COL_SAMPLE_SIZE,
  COL_PERSONS,
  COL_PROPORTION,
  COL_CI_LOW,
  COL_CI_HIGH,
];

// ─── Load statistics ─────────────────────────────────────────────────────────

/// Counters for cells that had to be coerced while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
  pub rows:              usize,
  /// Numeric cells holding text that does not parse as a number.
  pub non_numeric_cells: usize,
  /// Count cells holding a fractional value, rounded to the nearest integer.
  pub rounded_counts:    usize,
}

impl LoadStats {
  pub(crate) fn log_summary(&self, source: &str) {
    if self.non_numeric_cells > 0 || self.rounded_counts > 0 {
      tracing::warn!(
        source,
        rows = self.rows,
        non_numeric_cells = self.non_numeric_cells,
        rounded_counts = self.rounded_counts,
        "coerced malformed numeric cells while loading"
      );
    }
    tracing::info!(source, rows = self.rows, "loaded survey records");
  }

  /// Parse a textual numeric cell. Empty cells are missing; anything else
  /// that fails to parse is missing and counted.
  pub(crate) fn parse_number(&mut self, cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
      return None;
    }
    match cell.parse::<f64>() {
      Ok(v) if v.is_finite() => Some(v),
      _ => {
        self.non_numeric_cells += 1;
        None
      }
    }
  }

  fn to_count(&mut self, value: Option<f64>) -> Option<i64> {
    let v = value.filter(|v| v.is_finite())?;
    if v.fract() != 0.0 {
      self.rounded_counts += 1;
    }
    Some(v.round() as i64)
  }
}

/// Turn an optional text cell into an owned string; empty means missing.
pub(crate) fn text(cell: Option<&str>) -> Option<String> {
  cell.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// One source row with every cell parsed but not yet typed.
#[derive(Debug, Default)]
pub(crate) struct RawRow {
  pub year:              Option<f64>,
  pub location:          Option<String>,
  pub class:             Option<String>,
  pub topic:             Option<String>,
  pub question:          Option<String>,
  pub response:          Option<String>,
  pub breakout_value:    Option<String>,
  pub breakout_category: Option<String>,
  pub sample_size:       Option<f64>,
  pub persons:           Option<f64>,
  pub proportion:        Option<f64>,
  pub ci_low:            Option<f64>,
  pub ci_high:           Option<f64>,
}

impl RawRow {
  pub(crate) fn into_record(self, stats: &mut LoadStats) -> Record {
    stats.rows += 1;
    Record {
      year:              self.year.filter(|y| y.is_finite()).map(|y| y.round() as i32),
      location:          self.location,
      class:             self.class.unwrap_or_default(),
      topic:             self.topic.unwrap_or_default(),
      question:          self.question.unwrap_or_default(),
      response:          self.response.unwrap_or_default(),
      breakout_category: self.breakout_category.unwrap_or_default(),
      breakout_value:    self.breakout_value.unwrap_or_default(),
      sample_size:       stats.to_count(self.sample_size),
      persons:           stats.to_count(self.persons),
      proportion:        self.proportion,
      reported_ci_low:   self.ci_low,
      reported_ci_high:  self.ci_high,
    }
  }
}
