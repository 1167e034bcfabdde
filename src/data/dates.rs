use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::RawDate;

/// Date-time layouts tried in order after RFC 3339 / RFC 2822.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only layouts; the result is midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Parse a textual date in any of the accepted layouts.
///
/// Values carrying a UTC offset are normalised to UTC. Returns `None`
/// when nothing matches; the caller decides whether that is fatal.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Resolve a raw cell to a timestamp.
pub fn resolve(raw: &RawDate) -> Option<NaiveDateTime> {
    match raw {
        RawDate::Timestamp(ts) => Some(*ts),
        RawDate::Text(s) => parse_date(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn iso_forms() {
        assert_eq!(parse_date("2008-09-15"), Some(ymd_hms(2008, 9, 15, 0, 0, 0)));
        assert_eq!(
            parse_date("2008-09-15 13:45:00"),
            Some(ymd_hms(2008, 9, 15, 13, 45, 0))
        );
        assert_eq!(
            parse_date("2008-09-15T13:45:00.250"),
            Some(ymd_hms(2008, 9, 15, 13, 45, 0) + chrono::Duration::milliseconds(250))
        );
        assert_eq!(
            parse_date("  2008/09/15  "),
            Some(ymd_hms(2008, 9, 15, 0, 0, 0))
        );
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        assert_eq!(
            parse_date("2008-09-15T09:00:00+02:00"),
            Some(ymd_hms(2008, 9, 15, 7, 0, 0))
        );
        assert_eq!(
            parse_date("Mon, 15 Sep 2008 09:00:00 +0000"),
            Some(ymd_hms(2008, 9, 15, 9, 0, 0))
        );
    }

    #[test]
    fn prose_forms() {
        let expected = Some(ymd_hms(2008, 9, 15, 0, 0, 0));
        assert_eq!(parse_date("15 September 2008"), expected);
        assert_eq!(parse_date("September 15, 2008"), expected);
        assert_eq!(parse_date("15 Sep 2008"), expected);
        assert_eq!(parse_date("Sep 15, 2008"), expected);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2008-13-40"), None);
    }

    #[test]
    fn structured_values_pass_through() {
        let ts = ymd_hms(2007, 6, 1, 12, 0, 0);
        assert_eq!(resolve(&RawDate::Timestamp(ts)), Some(ts));
        assert_eq!(resolve(&RawDate::Text("2007-06-01 12:00:00".into())), Some(ts));
    }
}
