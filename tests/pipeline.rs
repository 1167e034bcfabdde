use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use arrow::array::{ArrayRef, StringArray, TimestampNanosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use flate2::write::GzEncoder;
use flate2::Compression;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use ft_sentiment::config::PipelineConfig;
use ft_sentiment::data::loader;
use ft_sentiment::data::model::RawDate;
use ft_sentiment::error::{DataLoadError, PipelineError};
use ft_sentiment::{
    analyse, moving_average, preprocess, run, score, smooth, DatePolicy, PolarityScorer,
    StandardVader,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const ARTICLES_JSON: &str = r#"[
    {"Title": "Rally", "Text": "Strong gains lift markets.", "Date": "2010-01-01"},
    {"Title": "Turmoil", "Text": "Banks collapse in the crisis.", "Date": "2008-01-01"},
    {"Title": "Old news", "Text": "Good results.", "Date": "2006-12-31"},
    {"Title": "Year end", "Text": "A weak finish.", "Date": "2009-12-31"},
    {"Title": "Midyear", "Text": "Profits improve.", "Date": "2007-06-01"},
    {"Title": "No body", "Text": null, "Date": "2008-03-01"}
]"#;

/// Scores fixed by title, so the moving average is easy to predict.
struct ByTitle;

impl PolarityScorer for ByTitle {
    fn compound(&self, text: &str) -> anyhow::Result<f64> {
        let value = match text.split(' ').next() {
            Some("a") => 0.1,
            Some("b") => 0.2,
            Some("c") => 0.3,
            Some("d") => 0.4,
            _ => 0.0,
        };
        Ok(value)
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    File::create(&path).unwrap().write_all(contents).unwrap();
    path
}

fn write_gz(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    enc.write_all(contents).unwrap();
    enc.finish().unwrap();
    path
}

fn headless(input: &Path, dir: &TempDir, window: usize) -> PipelineConfig {
    PipelineConfig {
        input: input.to_path_buf(),
        output: dir.path().join("trend.svg"),
        window,
        display: false,
        ..Default::default()
    }
}

fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[test]
fn gzip_json_and_plain_json_load_identically() {
    let dir = TempDir::new().unwrap();
    let plain = write_file(&dir, "a.json", ARTICLES_JSON.as_bytes());
    let gz = write_gz(&dir, "a.json.gz", ARTICLES_JSON.as_bytes());

    let a = loader::load(&plain).unwrap();
    let b = loader::load(&gz).unwrap();
    assert_eq!(a.len(), 6);
    assert_eq!(a, b);
}

#[test]
fn gzip_csv_loads() {
    let dir = TempDir::new().unwrap();
    let csv = "Title,Text,Date\nRally,\"Gains, again\",2008-05-01\nEmpty,,2008-05-02\n";
    let path = write_gz(&dir, "a.csv.gz", csv.as_bytes());
    let table = loader::load(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].text.as_deref(), Some("Gains, again"));
    assert_eq!(table.rows[1].text, None);
}

#[test]
fn parquet_with_timestamp_dates_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, true),
        Field::new("Text", DataType::Utf8, true),
        Field::new("Date", DataType::Timestamp(TimeUnit::Nanosecond, None), true),
    ]));
    let nanos = |t: NaiveDateTime| t.and_utc().timestamp_nanos_opt().unwrap();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("A"), Some("B"), None])),
        Arc::new(StringArray::from(vec![Some("x"), Some("y"), Some("z")])),
        Arc::new(TimestampNanosecondArray::from(vec![
            Some(nanos(ts(2008, 1, 2))),
            None,
            Some(nanos(ts(2009, 3, 4))),
        ])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = loader::load(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows[0].date, Some(RawDate::Timestamp(ts(2008, 1, 2))));
    assert_eq!(table.rows[1].date, None);
    assert_eq!(table.rows[2].title, None);

    let articles = preprocess(&table, DatePolicy::Strict).unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles.articles[0].title_and_text, "A x");
}

#[test]
fn parquet_without_date_column_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, true),
        Field::new("Text", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["A"])),
        Arc::new(StringArray::from(vec!["x"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    assert!(matches!(
        loader::load(&path),
        Err(DataLoadError::MissingColumn { column: "Date" })
    ));
}

#[test]
fn parquet_schema_is_checked_even_without_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, true),
        Field::new("Body", DataType::Utf8, true),
        Field::new("Date", DataType::Utf8, true),
    ]));
    let writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.close().unwrap();

    assert!(matches!(
        loader::load(&path),
        Err(DataLoadError::MissingColumn { column: "Text" })
    ));
}

#[test]
fn corrupt_gzip_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "a.json.gz", b"definitely not gzip");
    assert!(matches!(
        loader::load(&path),
        Err(DataLoadError::Decompress { .. })
    ));
}

#[test]
fn pickle_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "ft-articles.pkl.tar.gz", b"\x1f\x8b");
    assert!(matches!(
        loader::load(&path),
        Err(DataLoadError::UnsupportedFormat { .. })
    ));
}

// ---------------------------------------------------------------------------
// Stage properties
// ---------------------------------------------------------------------------

#[test]
fn preprocessing_invariants_hold() {
    let raw = loader::read_json(ARTICLES_JSON.as_bytes()).unwrap();
    let table = preprocess(&raw, DatePolicy::Strict).unwrap();

    let titles: Vec<&str> = table.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Midyear", "Turmoil", "Year end"]);

    for a in &table.articles {
        assert_eq!(a.title_and_text, format!("{} {}", a.title, a.text));
        assert!(a.date >= ts(2007, 1, 1) && a.date <= ts(2009, 12, 31));
    }
    assert!(table.articles.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn pandas_style_json_export_runs_end_to_end() {
    // Epoch-millisecond dates, as `df.to_json(orient="records")` writes them.
    let dec31 = ts(2009, 12, 31).and_utc().timestamp_millis();
    let json = format!(
        r#"[
        {{"Title": "a", "Text": "x", "Date": {}}},
        {{"Title": "b", "Text": "x", "Date": {dec31}}},
        {{"Title": "c", "Text": "x", "Date": {}}}
    ]"#,
        ts(2008, 1, 1).and_utc().timestamp_millis(),
        dec31 + 12 * 3600 * 1000,
    );
    let raw = loader::read_json(json.as_bytes()).unwrap();
    let (table, stats) =
        ft_sentiment::data::preprocess::preprocess_with_stats(&raw, DatePolicy::Strict).unwrap();

    let titles: Vec<&str> = table.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["a", "b"]);
    assert_eq!(stats.outside_period, 1);
}

#[test]
fn window_three_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    let json = r#"[
        {"Title": "c", "Text": "x", "Date": "2008-03-01"},
        {"Title": "a", "Text": "x", "Date": "2008-01-01"},
        {"Title": "d", "Text": "x", "Date": "2008-04-01"},
        {"Title": "b", "Text": "x", "Date": "2008-02-01"}
    ]"#;
    let input = write_file(&dir, "a.json", json.as_bytes());

    let (trend, report) = analyse(&headless(&input, &dir, 3), &ByTitle).unwrap();
    let ma: Vec<Option<f64>> = trend.rows.iter().map(|r| r.moving_average).collect();
    assert_eq!(ma[0], None);
    assert_eq!(ma[1], None);
    assert_abs_diff_eq!(ma[2].unwrap(), 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(ma[3].unwrap(), 0.3, epsilon = 1e-12);
    assert_eq!(report.plotted_points, 2);
}

#[test]
fn moving_average_matches_definition() {
    let scores: Vec<f64> = (0..40).map(|i| ((i * 37) % 17) as f64 / 8.5 - 1.0).collect();
    for w in [1, 2, 5, 13, 40, 41] {
        let window = NonZeroUsize::new(w).unwrap();
        let ma = moving_average(&scores, window);
        for (i, value) in ma.iter().enumerate() {
            if i + 1 >= w {
                let expected = scores[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
                assert_abs_diff_eq!(value.unwrap(), expected, epsilon = 1e-12);
            } else {
                assert_eq!(*value, None);
            }
        }
    }
}

#[test]
fn standard_vader_scores_stay_in_range() {
    let raw = loader::read_json(ARTICLES_JSON.as_bytes()).unwrap();
    let table = preprocess(&raw, DatePolicy::Strict).unwrap();
    let scored = score(table, &StandardVader::new()).unwrap();
    assert!(scored.rows.iter().all(|r| (-1.0..=1.0).contains(&r.score)));

    let trend = smooth(scored, NonZeroUsize::new(2).unwrap());
    assert_eq!(trend.points().count(), 2);
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn window_larger_than_rows_still_writes_chart() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "a.json", ARTICLES_JSON.as_bytes());
    let config = headless(&input, &dir, 500);

    let (trend, report) = run(&config, &StandardVader::new()).unwrap();
    assert_eq!(trend.len(), 3);
    assert!(trend.rows.iter().all(|r| r.moving_average.is_none()));
    assert_eq!(report.plotted_points, 0);

    let svg = std::fs::read_to_string(&config.output).unwrap();
    assert!(svg.contains("Moving Average Sentiment"));
}

#[test]
fn reruns_are_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "a.json", ARTICLES_JSON.as_bytes());
    let config = headless(&input, &dir, 2);
    let analyzer = StandardVader::new();

    let (first, _) = run(&config, &analyzer).unwrap();
    let first_svg = std::fs::read(&config.output).unwrap();
    let (second, _) = run(&config, &analyzer).unwrap();
    let second_svg = std::fs::read(&config.output).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_svg, second_svg);
}

#[test]
fn strict_dates_abort_the_run_without_a_chart() {
    let dir = TempDir::new().unwrap();
    let json = r#"[
        {"Title": "a", "Text": "x", "Date": "2008-01-01"},
        {"Title": "b", "Text": "x", "Date": "sometime in 2008"}
    ]"#;
    let input = write_file(&dir, "a.json", json.as_bytes());
    let config = headless(&input, &dir, 1);

    let err = run(&config, &StandardVader::new()).unwrap_err();
    assert!(matches!(err, PipelineError::DateParse(ref e) if e.row == 1));
    assert!(err.to_string().starts_with("preprocess stage"));
    assert!(!config.output.exists());

    let lenient = PipelineConfig {
        date_policy: DatePolicy::Lenient,
        ..config.clone()
    };
    let (trend, report) = run(&lenient, &StandardVader::new()).unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(report.preprocess.skipped_unparseable, 1);
    assert!(lenient.output.exists());
}

#[test]
fn missing_input_fails_in_load_stage() {
    let dir = TempDir::new().unwrap();
    let config = headless(&dir.path().join("absent.parquet"), &dir, 5);
    let err = run(&config, &StandardVader::new()).unwrap_err();
    assert!(matches!(err, PipelineError::Load(DataLoadError::NotFound { .. })));
}

#[test]
fn zero_window_fails_before_loading() {
    let dir = TempDir::new().unwrap();
    let config = headless(&dir.path().join("absent.parquet"), &dir, 0);
    let err = run(&config, &StandardVader::new()).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn unwritable_output_fails_in_render_stage() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "a.json", ARTICLES_JSON.as_bytes());
    let config = PipelineConfig {
        output: dir.path().join("missing-dir").join("trend.svg"),
        ..headless(&input, &dir, 1)
    };
    let err = run(&config, &StandardVader::new()).unwrap_err();
    assert!(matches!(err, PipelineError::Render(_)));
}
