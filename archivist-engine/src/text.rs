//! Field helpers shared by engine adapters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use html2text::render::text_renderer::TrivialDecorator;

// Wide enough that wrapping never splits ordinary words; output is re-flowed anyway.
const RENDER_WIDTH: usize = 1024;

// Qi (quintillion) covers u64::MAX, so rounding always has a suffix to carry into.
const MAGNITUDE_SUFFIXES: [&str; 7] = ["", "K", "M", "B", "T", "Qa", "Qi"];

/// Convert an HTML fragment to a single line of readable text.
///
/// Tags are dropped, entities decoded and every whitespace run collapsed to
/// one space. Tables are walked cell by cell without drawing borders.
///
/// ```
/// use archivist_engine::text::html_to_text;
///
/// assert_eq!(html_to_text("<b>Hi</b> &amp; bye"), "Hi & bye");
/// ```
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let rendered = html2text::config::with_decorator(TrivialDecorator::new())
        .raw_mode(true)
        .string_from_read(html.as_bytes(), RENDER_WIDTH);
    match rendered {
        Ok(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        Err(err) => {
            tracing::warn!(target: "engine.text", error = %err, "html_to_text.failed");
            String::new()
        }
    }
}

/// Render a count with at most three significant digits and a magnitude
/// suffix (`K`, `M`, `B`, `T`, `Qa`, `Qi`).
///
/// ```
/// use archivist_engine::text::humanize_number;
///
/// assert_eq!(humanize_number(12_345), "12.3K");
/// assert_eq!(humanize_number(999), "999");
/// ```
pub fn humanize_number(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let last = MAGNITUDE_SUFFIXES.len() - 1;
    let mut value = n as f64;
    let mut idx = 0;
    while value >= 1000.0 && idx < last {
        value /= 1000.0;
        idx += 1;
    }

    let mut rendered = three_significant(value);
    // 999_950 rounds up to "1000K"; carry into the next magnitude.
    if rendered == "1000" && idx < last {
        idx += 1;
        rendered = "1".to_string();
    }
    format!("{rendered}{}", MAGNITUDE_SUFFIXES[idx])
}

fn three_significant(value: f64) -> String {
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{value:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b, %Y", "%b %d, %Y", "%d %b %Y"];

/// Parse a timestamp as published by upstream APIs.
///
/// Offsets are honoured; values without one are taken as UTC and bare dates
/// as midnight UTC. Returns `None` for anything unrecognised.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
