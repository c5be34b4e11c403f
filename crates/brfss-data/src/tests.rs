//! Loader tests against in-memory and temporary files.

use std::{io::Write as _, path::Path};

use brfss_core::{
  aggregate,
  filter::Selection,
  panel::{AgeGranularity, all_panels},
};

use crate::{DataFormat, Error, load_dataset, read_csv};

const HEADER: &str = "Year,Locationabbr,Class,Topic,Question,Response,Break_Out,Break_Out_Category,Sample_Size,Data_value,Confidence_limit_Low,Confidence_limit_High,proportion,persons";

fn csv_fixture() -> String {
  [
    HEADER,
    "2015,WA,Tobacco Use,Current Smoker Status,Adults who are current smokers,Yes,Overall,Overall,100,40.0,30.4,49.6,0.4,40",
    "2016,WA,Tobacco Use,Current Smoker Status,Adults who are current smokers,Yes,Overall,Overall,200,50.0,43.1,56.9,0.5,100",
    "2016,AK,Tobacco Use,Current Smoker Status,Adults who are current smokers,No,Overall,Overall,150,60.0,52.2,67.8,0.6,90",
    "2016,AK,Tobacco Use,Current Smoker Status,Adults who are current smokers,Yes,Male,Sex,n/a,,,,,12",
    ",,Tobacco Use,Current Smoker Status,Adults who are current smokers,Yes,18-24,Age Group,80,25.0,,,0.25,20.4",
  ]
  .join("\n")
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

#[test]
fn csv_reads_typed_records() {
  let csv = csv_fixture();
  let records = read_csv(csv.as_bytes(), "fixture").unwrap();
  assert_eq!(records.len(), 5);

  let first = &records[0];
  assert_eq!(first.year, Some(2015));
  assert_eq!(first.location.as_deref(), Some("WA"));
  assert_eq!(first.breakout_category, "Overall");
  assert_eq!(first.sample_size, Some(100));
  assert_eq!(first.persons, Some(40));
  assert_eq!(first.proportion, Some(0.4));
  assert_eq!(first.reported_ci_low, Some(30.4));
}

#[test]
fn csv_malformed_cells_become_missing() {
  let csv = csv_fixture();
  let records = read_csv(csv.as_bytes(), "fixture").unwrap();

  let male = &records[3];
  assert_eq!(male.sample_size, None);
  assert_eq!(male.persons, Some(12));
  assert_eq!(male.proportion, None);

  let age = &records[4];
  assert_eq!(age.year, None);
  assert_eq!(age.location, None);
  assert_eq!(age.persons, Some(20));
}

#[test]
fn csv_missing_column_is_rejected() {
  let csv = "Year,Class,Topic\n2015,a,b\n";
  let err = read_csv(csv.as_bytes(), "fixture").unwrap_err();
  assert!(matches!(err, Error::MissingColumn("Locationabbr")), "{err}");
}

#[test]
fn csv_header_only_is_empty() {
  let records = read_csv(HEADER.as_bytes(), "fixture").unwrap();
  assert!(records.is_empty());
}

#[test]
fn csv_rows_aggregate_end_to_end() {
  let csv = csv_fixture();
  let records = read_csv(csv.as_bytes(), "fixture").unwrap();
  let agg = aggregate(
    records.iter().filter(|r| r.breakout_category == "Overall"),
    |r| r.response.clone(),
    |a, b| a.cmp(b),
  );
  let yes = agg.get(&"Yes".to_string()).unwrap();
  assert_eq!((yes.total_sample_size, yes.total_persons), (300, 140));
  let p = yes.proportion().unwrap();
  assert!((p - 0.4667).abs() < 1e-4, "{p}");
}

// ─── Files ───────────────────────────────────────────────────────────────────

#[test]
fn format_is_inferred_from_extension() {
  assert_eq!(DataFormat::from_path(Path::new("cleaned.csv")), DataFormat::Csv);
  assert_eq!(DataFormat::from_path(Path::new("data/CLEANED.CSV")), DataFormat::Csv);
  assert_eq!(DataFormat::from_path(Path::new("cleaned.parquet")), DataFormat::Parquet);
  assert_eq!("CSV".parse::<DataFormat>().unwrap(), DataFormat::Csv);
  assert!(matches!("xlsx".parse::<DataFormat>(), Err(Error::UnknownFormat(_))));
}

#[test]
fn load_dataset_from_csv_file() {
  let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
  file.write_all(csv_fixture().as_bytes()).unwrap();
  file.flush().unwrap();

  let dataset = load_dataset(file.path(), None).unwrap();
  assert_eq!(dataset.len(), 5);
  assert_eq!(dataset.classes(), vec!["Tobacco Use"]);

  let selection = dataset.default_selection().unwrap();
  assert_eq!(
    selection,
    Selection::new(
      "Tobacco Use",
      "Current Smoker Status",
      "Adults who are current smokers"
    )
  );
  let rows = dataset.select(&selection);
  let panels = all_panels(&rows, AgeGranularity::Less);
  assert_eq!(panels.len(), 7);
  assert!(!panels[0].no_data);
}

#[test]
fn load_dataset_missing_file_is_io_error() {
  let err = load_dataset(Path::new("/nonexistent/brfss.csv"), None).unwrap_err();
  assert!(matches!(err, Error::Io(_)), "{err}");
}

// ─── Parquet ─────────────────────────────────────────────────────────────────

#[cfg(feature = "parquet")]
mod parquet_input {
  use std::sync::Arc;

  use arrow_array::{
    ArrayRef, DictionaryArray, Float64Array, Int64Array, RecordBatch, StringArray,
    Int16Array, UInt32Array,
    types::{Int8Type, Int32Type},
  };
  use arrow_schema::{DataType, Field, Schema};
  use bytes::Bytes;
  use parquet::arrow::ArrowWriter;

  use crate::{Error, read_parquet_bytes};

  fn dict(values: &[&str]) -> ArrayRef {
    Arc::new(values.iter().copied().collect::<DictionaryArray<Int32Type>>())
  }

  fn dict8(values: &[&str]) -> ArrayRef {
    Arc::new(values.iter().copied().collect::<DictionaryArray<Int8Type>>())
  }

  fn strings(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
  }

  fn write(batch: &RecordBatch) -> Bytes {
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
    Bytes::from(buf)
  }

  fn batch(include_persons: bool) -> RecordBatch {
    let dict_type =
      DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let mut fields = vec![
      Field::new("Year", DataType::Int64, true),
      Field::new("Locationabbr", DataType::Utf8, true),
      Field::new("Class", dict_type.clone(), false),
      Field::new("Topic", dict_type.clone(), false),
      Field::new("Question", dict_type.clone(), false),
      Field::new("Response", DataType::Utf8, true),
      Field::new("Break_Out", DataType::Utf8, true),
      Field::new("Break_Out_Category", dict_type, false),
      Field::new("Sample_Size", DataType::Float64, true),
      Field::new("proportion", DataType::Float64, true),
      Field::new("Confidence_limit_Low", DataType::Float64, true),
      Field::new("Confidence_limit_High", DataType::Float64, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
      Arc::new(Int64Array::from(vec![Some(2015), None])),
      strings(&[Some("WA"), None]),
      dict(&["Tobacco Use", "Tobacco Use"]),
      dict(&["Current Smoker Status", "Current Smoker Status"]),
      dict(&["Smokers", "Smokers"]),
      strings(&[Some("Yes"), Some("No")]),
      strings(&[Some("Overall"), Some("Overall")]),
      dict(&["Overall", "Overall"]),
      Arc::new(Float64Array::from(vec![Some(120.0), Some(f64::NAN)])),
      Arc::new(Float64Array::from(vec![Some(0.25), None])),
      Arc::new(Float64Array::from(vec![Some(17.3), None])),
      Arc::new(Float64Array::from(vec![Some(32.7), None])),
    ];
    if include_persons {
      fields.push(Field::new("persons", DataType::Utf8, true));
      columns.push(strings(&[Some("30"), Some("bogus")]));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
  }

  #[test]
  fn parquet_reads_dictionary_and_numeric_columns() {
    let bytes = write(&batch(true));
    let records = read_parquet_bytes(bytes, "fixture").unwrap();
    assert_eq!(records.len(), 2);

    let yes = &records[0];
    assert_eq!(yes.year, Some(2015));
    assert_eq!(yes.class, "Tobacco Use");
    assert_eq!(yes.question, "Smokers");
    assert_eq!(yes.breakout_category, "Overall");
    assert_eq!(yes.sample_size, Some(120));
    assert_eq!(yes.persons, Some(30));
    assert_eq!(yes.reported_ci_high, Some(32.7));

    let no = &records[1];
    assert_eq!(no.year, None);
    assert_eq!(no.location, None);
    assert_eq!(no.sample_size, None);
    assert_eq!(no.persons, None);
  }

  #[test]
  fn parquet_missing_column_is_rejected() {
    let bytes = write(&batch(false));
    let err = read_parquet_bytes(bytes, "fixture").unwrap_err();
    assert!(matches!(err, Error::MissingColumn("persons")), "{err}");
  }

  /// Categoricals with narrow keys and narrow or unsigned integer counts.
  fn narrow_batch() -> RecordBatch {
    let dict8_type =
      DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::Utf8));
    let fields = vec![
      Field::new("Year", DataType::Int16, true),
      Field::new("Locationabbr", dict8_type.clone(), true),
      Field::new("Class", dict8_type.clone(), false),
      Field::new("Topic", dict8_type.clone(), false),
      Field::new("Question", dict8_type.clone(), false),
      Field::new("Response", dict8_type.clone(), false),
      Field::new("Break_Out", dict8_type.clone(), false),
      Field::new("Break_Out_Category", dict8_type, false),
      Field::new("Sample_Size", DataType::UInt32, true),
      Field::new("persons", DataType::UInt32, true),
      Field::new("proportion", DataType::Float64, true),
      Field::new("Confidence_limit_Low", DataType::Float64, true),
      Field::new("Confidence_limit_High", DataType::Float64, true),
    ];
    let columns: Vec<ArrayRef> = vec![
      Arc::new(Int16Array::from(vec![Some(2016), Some(2017)])),
      dict8(&["WA", "OR"]),
      dict8(&["Tobacco Use", "Tobacco Use"]),
      dict8(&["Current Smoker Status", "Current Smoker Status"]),
      dict8(&["Smokers", "Smokers"]),
      dict8(&["Yes", "No"]),
      dict8(&["Male", "Female"]),
      dict8(&["Sex", "Sex"]),
      Arc::new(UInt32Array::from(vec![Some(200), None])),
      Arc::new(UInt32Array::from(vec![Some(50), Some(7)])),
      Arc::new(Float64Array::from(vec![Some(0.25), None])),
      Arc::new(Float64Array::from(vec![None, None])),
      Arc::new(Float64Array::from(vec![None, None])),
    ];
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
  }

  #[test]
  fn parquet_reads_int8_dictionaries_and_narrow_integers() {
    let records = read_parquet_bytes(write(&narrow_batch()), "pandas").unwrap();
    assert_eq!(records.len(), 2);

    let male = &records[0];
    assert_eq!(male.year, Some(2016));
    assert_eq!(male.location.as_deref(), Some("WA"));
    assert_eq!(male.class, "Tobacco Use");
    assert_eq!(male.response, "Yes");
    assert_eq!(male.breakout_value, "Male");
    assert_eq!(male.breakout_category, "Sex");
    assert_eq!(male.sample_size, Some(200));
    assert_eq!(male.persons, Some(50));
    // All-null CI columns read as missing rather than failing the load.
    assert_eq!(male.reported_ci_low, None);

    let female = &records[1];
    assert_eq!(female.year, Some(2017));
    assert_eq!(female.location.as_deref(), Some("OR"));
    assert_eq!(female.sample_size, None);
    assert_eq!(female.persons, Some(7));
  }
}
