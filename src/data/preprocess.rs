use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::dates;
use super::model::{Article, ArticleTable, RawTable};
use crate::error::DateParseError;

/// First day of the study period (inclusive).
pub const PERIOD_START: NaiveDate = match NaiveDate::from_ymd_opt(2007, 1, 1) {
    Some(d) => d,
    None => panic!("invalid period start"),
};

/// Last day of the study period. Bounds are compared as midnight
/// timestamps, so anything later on this day falls outside.
pub const PERIOD_END: NaiveDate = match NaiveDate::from_ymd_opt(2009, 12, 31) {
    Some(d) => d,
    None => panic!("invalid period end"),
};

/// What to do with a date that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Abort preprocessing with [`DateParseError`].
    #[default]
    Strict,
    /// Skip the row and log a warning.
    Lenient,
}

/// Row counts of one preprocessing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    pub input_rows: usize,
    pub dropped_missing: usize,
    pub skipped_unparseable: usize,
    pub outside_period: usize,
    pub kept: usize,
}

/// Bring a raw table to analysis-ready shape.
pub fn preprocess(raw: &RawTable, policy: DatePolicy) -> Result<ArticleTable, DateParseError> {
    preprocess_with_stats(raw, policy).map(|(table, _)| table)
}

/// [`preprocess`], also returning how many rows each step removed.
///
/// Steps, in order:
/// 1. drop rows missing Title, Text or Date
/// 2. merge title and text
/// 3. parse the date
/// 4. keep 2007-01-01 00:00 ..= 2009-12-31 00:00
/// 5. stable sort by date
pub fn preprocess_with_stats(
    raw: &RawTable,
    policy: DatePolicy,
) -> Result<(ArticleTable, PreprocessStats), DateParseError> {
    let mut stats = PreprocessStats {
        input_rows: raw.len(),
        ..Default::default()
    };

    let mut articles = Vec::with_capacity(raw.len());

    for (row, rec) in raw.rows.iter().enumerate() {
        let (Some(title), Some(text), Some(raw_date)) = (&rec.title, &rec.text, &rec.date) else {
            stats.dropped_missing += 1;
            continue;
        };

        let date = match dates::resolve(raw_date) {
            Some(date) => date,
            None => match policy {
                DatePolicy::Strict => {
                    return Err(DateParseError {
                        row,
                        value: raw_date.to_string(),
                    });
                }
                DatePolicy::Lenient => {
                    log::warn!("row {row}: skipping unparseable date '{raw_date}'");
                    stats.skipped_unparseable += 1;
                    continue;
                }
            },
        };

        articles.push(Article::new(title.clone(), text.clone(), date));
    }

    let before_filter = articles.len();
    let period = period_start()..=period_end();
    articles.retain(|a| period.contains(&a.date));
    stats.outside_period = before_filter - articles.len();

    // `sort_by_key` is stable: equal dates keep file order.
    articles.sort_by_key(|a| a.date);
    stats.kept = articles.len();

    Ok((ArticleTable { articles }, stats))
}

pub fn period_start() -> NaiveDateTime {
    PERIOD_START.and_time(NaiveTime::MIN)
}

pub fn period_end() -> NaiveDateTime {
    PERIOD_END.and_time(NaiveTime::MIN)
}
