//! CSV loader.

use std::io::Read;

use brfss_core::Record;

use crate::{
  Error, Result,
  columns::{LoadStats, RawRow, REQUIRED_COLUMNS, text},
};

/// Read every row of a CSV stream with a header line.
///
/// Fails with [`Error::MissingColumn`] before reading any row when a required
/// header is absent. Extra columns are ignored.
pub fn read_csv<R: Read>(reader: R, source: &str) -> Result<Vec<Record>> {
  let mut csv_reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(csv::Trim::Headers)
    .from_reader(reader);

  let headers = csv_reader.headers()?.clone();
  let mut index = [0usize; REQUIRED_COLUMNS.len()];
  for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
    *slot = headers
      .iter()
      .position(|h| h == name)
      .ok_or(Error::MissingColumn(name))?;
  }

  let mut stats = LoadStats::default();
  let mut records = Vec::new();
  let mut row = csv::StringRecord::new();
  while csv_reader.read_record(&mut row)? {
    let cell = |i: usize| row.get(index[i]);
    let raw = RawRow {
      year:              stats.parse_number(cell(0)),
      location:          text(cell(1)),
      class:             text(cell(2)),
      topic:             text(cell(3)),
      question:          text(cell(4)),
      response:          text(cell(5)),
      breakout_value:    text(cell(6)),
      breakout_category: text(cell(7)),
      sample_size:       stats.parse_number(cell(8)),
      persons:           stats.parse_number(cell(9)),
      proportion:        stats.parse_number(cell(10)),
      ci_low:            stats.parse_number(cell(11)),
      ci_high:           stats.parse_number(cell(12)),
    };
    records.push(raw.into_record(&mut stats));
  }

  stats.log_summary(source);
  Ok(records)
}
