//! Text cleaners for values read off SAFER pages.
//!
//! Every function here is total: text that does not parse turns into the field's
//! default (0, `None`, empty string) instead of an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Dates on SAFER pages are always `MM/DD/YYYY`.
const DATE_FORMAT: &str = "%m/%d/%Y";
const DATE_LEN: usize = 10;

/// Sentinel SAFER writes on address lines that are intentionally blank.
const ADDRESS_BLANK_LINE: &str = "X";

/// `&nbsp;` followed by a plain space, as found between state and zip code.
const NBSP_PAIR: &str = "\u{a0} ";

/// Placeholder shown when a carrier has no DUNS number.
const DUNS_PLACEHOLDER: &str = "--";

static LINK_QUERY_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"query_string=([0-9]+)").expect("Link target regex is hardcoded and valid")
});

// Exactly one space before the year; "1,100,158,928(2020)" does not match.
static MILEAGE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9,]+) \(([0-9]{4})\)").expect("Mileage/year regex is hardcoded and valid")
});

// ── Numbers ───────────────────────────────────────────────────────────────────

/// Parse a count with thousands separators.
/// "10,884" → 10884 | "$1,290" → 0 | "" → 0
pub fn parse_int(s: &str) -> u64 {
    if s.is_empty() {
        return 0;
    }
    s.replace(',', "").parse().unwrap_or(0)
}

/// Parse a percentage into a fraction of 1.
/// "1.4%" → 0.014 | "3.45" → 0.0345 | "N/A" → 0.0
pub fn parse_pct(s: &str) -> f64 {
    let s = s.strip_suffix('%').unwrap_or(s);
    match s.parse::<f64>() {
        Ok(pct) if pct.is_finite() => pct / 100.0,
        _ => 0.0,
    }
}

/// Parse the MCS-150 "mileage (year)" cell.
/// "1,100,158,928 (2020)" → (1100158928, "2020")
pub fn parse_mileage_year(s: &str) -> (u64, String) {
    match MILEAGE_YEAR.captures(s) {
        Some(caps) => (parse_int(&caps[1]), caps[2].to_string()),
        None => (0, String::new()),
    }
}

// ── Dates ─────────────────────────────────────────────────────────────────────

/// Parse `MM/DD/YYYY`, looking only at the first ten characters so trailing
/// text after the date is tolerated.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..DATE_LEN)?;
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Join the text lines of an address cell into one line.
pub fn parse_address<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| *line != ADDRESS_BLANK_LINE)
        .map(|line| line.replace(NBSP_PAIR, ""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull the DOT number out of a search result link.
/// "query.asp?...&query_string=2819773&..." → "2819773"
pub fn parse_dot_from_link(href: &str) -> String {
    LINK_QUERY_STRING
        .captures(href)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// DUNS cell text, with the `--` placeholder mapped to "".
pub fn clean_duns(s: String) -> String {
    if s == DUNS_PLACEHOLDER { String::new() } else { s }
}

/// Trim a DOT or MC/MX query value and drop an `MC-`/`MX-`/`FF-` prefix.
/// "MC-133655" → "133655"
pub fn normalise_query(s: &str) -> String {
    let s = s.trim();
    match s.get(..3) {
        Some(prefix)
            if ["MC-", "MX-", "FF-"]
                .iter()
                .any(|p| p.eq_ignore_ascii_case(prefix)) =>
        {
            s[3..].trim().to_string()
        }
        _ => s.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
