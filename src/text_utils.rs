use chrono::{DateTime, FixedOffset, NaiveDate};

const SPACE_SEPARATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Parses a timestamp that carries an explicit UTC offset.
///
/// Accepts RFC 3339 (`2023-05-22T01:00:00+02:00`, `2023-05-22T01:00:00Z`) and the
/// same layout with a space instead of the `T`. Dates without an offset are rejected.
pub fn parse_date_time(buf: &str) -> Result<DateTime<FixedOffset>, String> {
    let buf = buf.trim();
    if buf.is_empty() {
        return Err("empty date".to_string());
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(buf) {
        return Ok(date_time);
    }

    DateTime::parse_from_str(buf, SPACE_SEPARATED_FORMAT)
        .map_err(|e| format!("Unable to parse date time {} ({}); expected RFC 3339 with an offset", buf, e))
}

pub fn format_date_time(date_time: &DateTime<FixedOffset>) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Lower case, ASCII only, words joined by `_`.
pub fn url_from_title(title: &str) -> String {
    let ascii = unidecode::unidecode(title);
    let alpha_chars: String = ascii.chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '_')
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    let mut url = String::new();
    let mut prev_char = None;

    for c in alpha_chars.chars() {
        if c != '_' || prev_char != Some('_') {
            url.push(c);
        }
        prev_char = Some(c);
    }

    url.trim_matches('_').to_string()
}

pub fn post_name_from_title(title: &str, date: &NaiveDate) -> String {
    let date = date.format("%Y%m%d");
    format!("{}_{}", date, url_from_title(title))
}
