use std::fmt;
use std::num::NonZeroUsize;

use chrono::{Datelike, NaiveDateTime};

// ---------------------------------------------------------------------------
// RawDate – a Date cell as it came out of the file
// ---------------------------------------------------------------------------

/// A date cell before preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// Textual value that still has to be parsed.
    Text(String),
    /// Already structured (Parquet timestamp / date columns).
    Timestamp(NaiveDateTime),
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::Text(s) => write!(f, "{s}"),
            RawDate::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – output of the loader
// ---------------------------------------------------------------------------

/// One record of the input file. `None` means the cell was missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub text: Option<String>,
    pub date: Option<RawDate>,
}

/// The table exactly as loaded, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawArticle>,
}

impl RawTable {
    pub fn new(rows: Vec<RawArticle>) -> Self {
        RawTable { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ArticleTable – output of the preprocessor
// ---------------------------------------------------------------------------

/// A complete, dated article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub text: String,
    /// `title + " " + text`, the input of the analyzer.
    pub title_and_text: String,
    pub date: NaiveDateTime,
}

impl Article {
    pub fn new(title: String, text: String, date: NaiveDateTime) -> Self {
        let title_and_text = format!("{title} {text}");
        Article {
            title,
            text,
            title_and_text,
            date,
        }
    }
}

/// Articles with no missing cells, inside the study period, sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleTable {
    pub articles: Vec<Article>,
}

impl ArticleTable {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScoredTable / TrendTable – outputs of the scorer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub article: Article,
    /// Compound polarity in [-1, 1].
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredTable {
    pub rows: Vec<ScoredArticle>,
}

impl ScoredTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores in row order.
    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.score).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub article: Article,
    pub score: f64,
    /// Trailing mean of `score`; `None` until a full window is available.
    pub moving_average: Option<f64>,
}

/// The fully enriched table: everything the chart needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendTable {
    pub rows: Vec<TrendRow>,
    pub window: NonZeroUsize,
}

impl TrendTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(date, moving average)` for every row where the average is defined.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(|r| r.moving_average.map(|ma| (r.article.date, ma)))
    }

    /// Contiguous runs of defined points. Undefined rows split runs, so a
    /// renderer never connects across a gap.
    pub fn segments(&self) -> Vec<Vec<(NaiveDateTime, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for row in &self.rows {
            match row.moving_average {
                Some(ma) => current.push((row.article.date, ma)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

// ---------------------------------------------------------------------------
// Plot coordinates
// ---------------------------------------------------------------------------

fn year_start(year: i32) -> Option<NaiveDateTime> {
    chrono::NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Map a timestamp to a fractional year (2008.5 is roughly 1 July 2008),
/// the x coordinate used by both chart backends.
pub fn fractional_year(ts: NaiveDateTime) -> f64 {
    let year = ts.year();
    match (year_start(year), year_start(year + 1)) {
        (Some(start), Some(end)) => {
            let elapsed = (ts - start).num_seconds() as f64;
            let total = (end - start).num_seconds() as f64;
            year as f64 + elapsed / total
        }
        _ => year as f64,
    }
}

/// Inverse of [`fractional_year`] at month resolution, e.g. `"2008-07"`.
pub fn year_month_label(x: f64) -> String {
    let year = x.floor() as i32;
    match (year_start(year), year_start(year + 1)) {
        (Some(start), Some(end)) => {
            let secs = ((x - year as f64) * (end - start).num_seconds() as f64).round() as i64;
            (start + chrono::Duration::seconds(secs))
                .format("%Y-%m")
                .to_string()
        }
        _ => format!("{year:04}"),
    }
}
