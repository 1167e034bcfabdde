use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Date32Array, Date64Array, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::DateTime;
use flate2::read::GzDecoder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{RawArticle, RawDate, RawTable};
use crate::error::DataLoadError;

pub const TITLE: &str = "Title";
pub const TEXT: &str = "Text";
pub const DATE: &str = "Date";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// On-disk layouts understood by [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Parquet,
    Json,
    JsonLines,
    Csv,
}

/// Work out the format from the file name; a trailing `.gz` means the
/// payload is gzip-wrapped.
pub fn detect_format(path: &Path) -> Option<(Format, bool)> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    let (inner, gzipped) = match name.strip_suffix(".gz") {
        Some(inner) => (inner.to_string(), true),
        None => (name, false),
    };
    let ext = Path::new(&inner).extension()?.to_str()?;

    let format = match ext {
        "parquet" | "pq" => Format::Parquet,
        "json" => Format::Json,
        "jsonl" | "ndjson" => Format::JsonLines,
        "csv" => Format::Csv,
        _ => return None,
    };
    Some((format, gzipped))
}

/// Load the article table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `Title`, `Text` (strings) and `Date` (string,
///   timestamp or date) (recommended)
/// * `.json`    – `[{ "Title": ..., "Text": ..., "Date": ... }, ...]`
/// * `.jsonl`   – one such object per line
/// * `.csv`     – header row naming `Title`, `Text`, `Date`
///
/// Each may be gzip-compressed with a `.gz` suffix.
pub fn load(path: &Path) -> Result<RawTable, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let (format, gzipped) = detect_format(path).ok_or_else(|| DataLoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    log::debug!("loading {} as {format:?} (gzip: {gzipped})", path.display());

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes = if gzipped {
        let mut buf = Vec::new();
        GzDecoder::new(file)
            .read_to_end(&mut buf)
            .map_err(|source| DataLoadError::Decompress {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        let mut buf = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut buf)
            .map_err(|source| DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    };

    let table = match format {
        Format::Parquet => read_parquet(Bytes::from(bytes))?,
        Format::Json => read_json(&bytes)?,
        Format::JsonLines => read_json_lines(&bytes)?,
        Format::Csv => read_csv(Cursor::new(bytes))?,
    };

    log::info!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Title": "Northern Rock seeks support", "Text": "...", "Date": "2007-09-14" },
///   { "Title": "...", "Text": "...", "Date": 1199145600000 },
///   ...
/// ]
/// ```
///
/// An integer `Date` is epoch milliseconds, which is how pandas writes
/// datetime columns unless `date_format="iso"` is given.
pub fn read_json(bytes: &[u8]) -> Result<RawTable, DataLoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;

    let records = root.as_array().ok_or_else(|| DataLoadError::NotTabular {
        reason: "expected a top-level JSON array of records".into(),
    })?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| json_record(rec, i))
        .collect::<Result<Vec<_>, _>>()?;

    if !rows.is_empty() {
        require_json_columns(records)?;
    }
    Ok(RawTable::new(rows))
}

/// One JSON object per line; blank lines are skipped.
pub fn read_json_lines(bytes: &[u8]) -> Result<RawTable, DataLoadError> {
    let mut rows = Vec::new();
    let mut records = Vec::new();

    for line in bytes.lines() {
        let line = line.map_err(|e| DataLoadError::NotTabular {
            reason: format!("unreadable line: {e}"),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let rec: JsonValue = serde_json::from_str(&line)?;
        rows.push(json_record(&rec, records.len())?);
        records.push(rec);
    }

    if !rows.is_empty() {
        require_json_columns(&records)?;
    }
    Ok(RawTable::new(rows))
}

/// A column absent from every record is a schema problem, not a missing value.
fn require_json_columns(records: &[JsonValue]) -> Result<(), DataLoadError> {
    for column in [TITLE, TEXT, DATE] {
        let present = records
            .iter()
            .any(|r| r.as_object().is_some_and(|o| o.contains_key(column)));
        if !present {
            return Err(DataLoadError::MissingColumn { column });
        }
    }
    Ok(())
}

fn json_record(rec: &JsonValue, row: usize) -> Result<RawArticle, DataLoadError> {
    let obj = rec.as_object().ok_or_else(|| DataLoadError::NotTabular {
        reason: format!("row {row} is not a JSON object"),
    })?;

    Ok(RawArticle {
        title: json_text(obj.get(TITLE), TITLE)?,
        text: json_text(obj.get(TEXT), TEXT)?,
        date: json_date(obj.get(DATE))?,
    })
}

fn json_date(val: Option<&JsonValue>) -> Result<Option<RawDate>, DataLoadError> {
    if let Some(JsonValue::Number(n)) = val {
        if let Some(millis) = n.as_i64() {
            // Out-of-range instants stay textual so strict parsing rejects them.
            return Ok(Some(match DateTime::from_timestamp_millis(millis) {
                Some(dt) => RawDate::Timestamp(dt.naive_utc()),
                None => RawDate::Text(millis.to_string()),
            }));
        }
    }
    Ok(json_text(val, DATE)?.map(RawDate::Text))
}

fn json_text(val: Option<&JsonValue>, column: &'static str) -> Result<Option<String>, DataLoadError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(DataLoadError::UnsupportedColumnType {
            column,
            found: json_kind(other).to_string(),
        }),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
        _ => "scalar",
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Empty cells deserialize to `None`, matching a missing value.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "Date")]
    date: Option<String>,
}

/// CSV layout: header row with column names; any extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    for column in [TITLE, TEXT, DATE] {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn { column });
        }
    }

    let rows = reader
        .deserialize::<CsvRecord>()
        .map(|rec| {
            rec.map(|r| RawArticle {
                title: r.title,
                text: r.text,
                date: r.date.map(RawDate::Text),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawTable::new(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing articles.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn read_parquet<R: ChunkReader + 'static>(input: R) -> Result<RawTable, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)?;
    // Checked up front: a file without row groups never yields a batch.
    for column in [TITLE, TEXT, DATE] {
        if builder.schema().field_with_name(column).is_err() {
            return Err(DataLoadError::MissingColumn { column });
        }
    }
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        append_batch(&batch, &mut rows)?;
    }
    Ok(RawTable::new(rows))
}

fn append_batch(batch: &RecordBatch, rows: &mut Vec<RawArticle>) -> Result<(), DataLoadError> {
    let column = |name: &'static str| {
        batch
            .column_by_name(name)
            .ok_or(DataLoadError::MissingColumn { column: name })
    };
    let title_col = column(TITLE)?;
    let text_col = column(TEXT)?;
    let date_col = column(DATE)?;

    for row in 0..batch.num_rows() {
        rows.push(RawArticle {
            title: string_at(title_col, row, TITLE)?,
            text: string_at(text_col, row, TEXT)?,
            date: date_at(date_col, row)?,
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

/// Extract a string cell from any of Arrow's string layouts.
fn string_at(
    col: &Arc<dyn Array>,
    row: usize,
    column: &'static str,
) -> Result<Option<String>, DataLoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        DataType::Utf8View => col.as_string_view().value(row),
        other => {
            return Err(DataLoadError::UnsupportedColumnType {
                column,
                found: format!("{other:?}"),
            })
        }
    };
    Ok(Some(value.to_string()))
}

/// Extract a date cell: strings stay textual, temporal types are converted.
fn date_at(col: &Arc<dyn Array>, row: usize) -> Result<Option<RawDate>, DataLoadError> {
    if col.is_null(row) {
        return Ok(None);
    }

    let ts = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            return Ok(string_at(col, row, DATE)?.map(RawDate::Text));
        }
        DataType::Timestamp(TimeUnit::Second, _) => {
            downcast::<TimestampSecondArray>(col)?.value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            downcast::<TimestampMillisecondArray>(col)?.value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            downcast::<TimestampMicrosecondArray>(col)?.value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            downcast::<TimestampNanosecondArray>(col)?.value_as_datetime(row)
        }
        DataType::Date32 => downcast::<Date32Array>(col)?.value_as_datetime(row),
        DataType::Date64 => downcast::<Date64Array>(col)?.value_as_datetime(row),
        other => {
            return Err(DataLoadError::UnsupportedColumnType {
                column: DATE,
                found: format!("{other:?}"),
            })
        }
    };

    // Out-of-range temporal values survive as text so strict parsing rejects them.
    Ok(Some(match ts {
        Some(ts) => RawDate::Timestamp(ts),
        None => RawDate::Text(format!("{:?}", col.slice(row, 1))),
    }))
}

fn downcast<T: 'static>(col: &Arc<dyn Array>) -> Result<&T, DataLoadError> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DataLoadError::UnsupportedColumnType {
            column: DATE,
            found: format!("{:?}", col.data_type()),
        })
}
