//! Publication date parsing.
//!
//! Fixed formats are tried in order and the first that parses wins; only
//! then is the permissive `dateparser` fallback consulted.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use url::Url;

use crate::patterns::{DATE_TEXT, DAY_ORDINAL, URL_DATE};

/// Date-time layouts seen in meta tags and `datetime` attributes.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only layouts, including the human forms found in bylines.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%Y%m%d",
];

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 2100;

/// Parse a date string with the fixed format list, then `dateparser`.
///
/// Dates without a time are taken as midnight UTC.
///
/// # Example
///
/// ```rust
/// use wxr_migrate::metadata::date::parse_date;
///
/// let date = parse_date("March 5th, 2024").map(|d| d.date_naive().to_string());
/// assert_eq!(date.as_deref(), Some("2024-03-05"));
/// ```
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    parse_fixed(s)
        .or_else(|| parse_permissive(s))
        .filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
}

fn parse_fixed(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    // "Mar. 5th, 2024" -> "Mar 5, 2024"
    let cleaned = DAY_ORDINAL.replace_all(s, "$1").replace(". ", " ");
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

/// `dateparser` happily turns a bare clock time into today's date, so it is
/// only consulted when the text carries a four-digit year.
fn parse_permissive(s: &str) -> Option<DateTime<Utc>> {
    let has_year = s.as_bytes().windows(4).any(|w| w.iter().all(u8::is_ascii_digit));
    if !has_year {
        return None;
    }
    dateparser::parse(s).ok()
}

/// Find the first recognizable date inside free text such as a byline.
#[must_use]
pub fn date_from_text(text: &str) -> Option<DateTime<Utc>> {
    DATE_TEXT.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|c| c.get(1))
            .find_map(|m| parse_date(m.as_str()))
    })
}

/// Date from `/YYYY/month/DD/` path segments, month as name or number.
#[must_use]
pub fn date_from_url(url: &str) -> Option<DateTime<Utc>> {
    let path = Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string());

    URL_DATE.captures_iter(&path).find_map(|caps| {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month = month_number(caps.get(2)?.as_str())?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(date.and_time(NaiveTime::MIN).and_utc())
    })
}

fn month_number(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let month = match token.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(d: Option<DateTime<Utc>>) -> Option<String> {
        d.map(|d| d.date_naive().to_string())
    }

    #[test]
    fn test_fixed_formats() {
        assert_eq!(ymd(parse_date("2024-01-15T10:30:00Z")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("2024-01-15T10:30:00+05:00")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("2024-01-15 08:00:00")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("2024-01-15")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("January 15, 2024")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("Jan 5, 2024")), Some("2024-01-05".into()));
        assert_eq!(ymd(parse_date("Jan. 5th, 2024")), Some("2024-01-05".into()));
        assert_eq!(ymd(parse_date("15 January 2024")), Some("2024-01-15".into()));
        assert_eq!(ymd(parse_date("01/15/2024")), Some("2024-01-15".into()));
    }

    #[test]
    fn test_first_format_wins() {
        // Ambiguous day/month: the US layout comes first.
        assert_eq!(ymd(parse_date("03/04/2024")), Some("2024-03-04".into()));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Posted in News"), None);
        assert_eq!(parse_date("10:30"), None);
    }

    #[test]
    fn test_date_from_text() {
        let text = "Posted by Admin | March 5, 2024 | News";
        assert_eq!(ymd(date_from_text(text)), Some("2024-03-05".into()));
        assert_eq!(ymd(date_from_text("Updated 2023-12-01")), Some("2023-12-01".into()));
        assert_eq!(date_from_text("no date here"), None);
    }

    #[test]
    fn test_date_from_url_month_name() {
        let url = "https://example.com/2024/march/5/new-cars";
        assert_eq!(ymd(date_from_url(url)), Some("2024-03-05".into()));
    }

    #[test]
    fn test_date_from_url_numeric() {
        let url = "https://example.com/blog/2023/11/28/post/";
        assert_eq!(ymd(date_from_url(url)), Some("2023-11-28".into()));
    }

    #[test]
    fn test_date_from_url_invalid() {
        assert_eq!(date_from_url("https://example.com/2024/13/40/x"), None);
        assert_eq!(date_from_url("https://example.com/2024/news/5/x"), None);
        assert_eq!(date_from_url("https://example.com/about"), None);
    }
}
