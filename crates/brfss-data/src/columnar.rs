//! Parquet loader.
//!
//! Every column is normalised with `arrow-cast` before rows are read: string
//! columns (plain, large, view, or dictionary encoded with any key width) to
//! `Utf8`, numeric columns of any width to `Float64`. pandas writes
//! categoricals with the narrowest key type that fits, usually `Int8`.

use arrow_array::{
  Array, ArrayRef, Float64Array, RecordBatch, StringArray, cast::AsArray,
  types::Float64Type,
};
use arrow_schema::DataType;
use brfss_core::Record;
use bytes::Bytes;
use parquet::{
  arrow::arrow_reader::ParquetRecordBatchReaderBuilder, file::reader::ChunkReader,
};

use crate::{
  Error, Result,
  columns::{LoadStats, RawRow, REQUIRED_COLUMNS, text},
};

/// Read every row of a Parquet file.
pub fn read_parquet<R>(reader: R, source: &str) -> Result<Vec<Record>>
where
  R: ChunkReader + 'static,
{
  let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;

  let schema = builder.schema().clone();
  let mut index = [0usize; REQUIRED_COLUMNS.len()];
  for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
    *slot = schema.index_of(name).map_err(|_| Error::MissingColumn(name))?;
  }

  let mut stats = LoadStats::default();
  let mut records = Vec::new();
  for batch in builder.build()? {
    read_batch(&batch?, &index, &mut stats, &mut records)?;
  }

  stats.log_summary(source);
  Ok(records)
}

/// Read a Parquet file held in memory.
pub fn read_parquet_bytes(bytes: Bytes, source: &str) -> Result<Vec<Record>> {
  read_parquet(bytes, source)
}

fn read_batch(
  batch: &RecordBatch,
  index: &[usize; REQUIRED_COLUMNS.len()],
  stats: &mut LoadStats,
  out: &mut Vec<Record>,
) -> Result<()> {
  let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
  for (&i, name) in index.iter().zip(REQUIRED_COLUMNS) {
    columns.push(Column::new(batch.column(i), name)?);
  }

  for row in 0..batch.num_rows() {
    let raw = RawRow {
      year:              columns[0].number(row, stats),
      location:          columns[1].text(row),
      class:             columns[2].text(row),
      topic:             columns[3].text(row),
      question:          columns[4].text(row),
      response:          columns[5].text(row),
      breakout_value:    columns[6].text(row),
      breakout_category: columns[7].text(row),
      sample_size:       columns[8].number(row, stats),
      persons:           columns[9].number(row, stats),
      proportion:        columns[10].number(row, stats),
      ci_low:            columns[11].number(row, stats),
      ci_high:           columns[12].number(row, stats),
    };
    out.push(raw.into_record(stats));
  }
  Ok(())
}

// ─── Column access ───────────────────────────────────────────────────────────

/// One Arrow column, cast to the single type rows are read from.
enum Column {
  Text(StringArray),
  Number(Float64Array),
  /// A column of only nulls.
  Null,
}

impl Column {
  fn new(array: &ArrayRef, name: &'static str) -> Result<Self> {
    if *array.data_type() == DataType::Null || array.null_count() == array.len() {
      return Ok(Self::Null);
    }
    let unsupported = || Error::UnsupportedColumnType {
      column:    name,
      data_type: array.data_type().to_string(),
    };
    match target_type(array.data_type()) {
      Some(DataType::Utf8) => arrow_cast::cast(array, &DataType::Utf8)?
        .as_string_opt::<i32>()
        .cloned()
        .map(Self::Text)
        .ok_or_else(unsupported),
      Some(_) => arrow_cast::cast(array, &DataType::Float64)?
        .as_primitive_opt::<Float64Type>()
        .cloned()
        .map(Self::Number)
        .ok_or_else(unsupported),
      None => Err(unsupported()),
    }
  }

  fn str_at(&self, row: usize) -> Option<&str> {
    match self {
      Self::Text(a) => (!a.is_null(row)).then(|| a.value(row)),
      _ => None,
    }
  }

  fn text(&self, row: usize) -> Option<String> {
    match self {
      Self::Number(a) => (!a.is_null(row)).then(|| a.value(row).to_string()),
      _ => text(self.str_at(row)),
    }
  }

  fn number(&self, row: usize, stats: &mut LoadStats) -> Option<f64> {
    match self {
      Self::Number(a) => {
        (!a.is_null(row)).then(|| a.value(row)).filter(|v| v.is_finite())
      }
      Self::Null => None,
      Self::Text(_) => stats.parse_number(self.str_at(row)),
    }
  }
}

/// `Utf8` for string-like columns, `Float64` for numeric ones, `None` for
/// anything rows cannot be read from.
fn target_type(data_type: &DataType) -> Option<DataType> {
  match data_type {
    DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Some(DataType::Utf8),
    DataType::Dictionary(_, values) => target_type(values),
    t if t.is_numeric() => Some(DataType::Float64),
    _ => None,
  }
}
