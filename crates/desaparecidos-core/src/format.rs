//! Display formatting for dates, phone numbers and long text.
//!
//! Dates from the registry come in several ISO 8601 variants: plain dates
//! (`2024-01-15`), local timestamps with or without fractional seconds
//! (`2024-01-15T10:30:00.000`), and RFC 3339 timestamps with an offset.
//! All of them are rendered in Brazilian order. Anything unparseable is
//! returned unchanged so the view never shows an empty field.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Render an ISO date or timestamp as `dd/mm/yyyy`.
pub fn format_date(value: &str) -> String {
    match parse_iso(value) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => value.to_string(),
    }
}

/// Render an ISO date or timestamp as `dd/mm/yyyy HH:MM`.
///
/// Plain dates render at midnight.
pub fn format_date_time(value: &str) -> String {
    match parse_iso(value) {
        Some(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        None => value.to_string(),
    }
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a stored phone number.
///
/// 10 digits become `(NN) NNNN-NNNN`, 11 digits become `(NN) NNNNN-NNNN`;
/// anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        _ => phone.to_string(),
    }
}

/// Progressive input mask for a phone number being typed.
///
/// Non-digits are dropped and at most 11 digits are kept.
pub fn mask_phone(input: &str) -> String {
    let digits = digits_only(input);
    let len = digits.len();
    match len {
        0..=2 => digits,
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..11]),
    }
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Cut `text` to `max_chars` characters and append `...` when it was longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only() {
        assert_eq!(format_date("2024-01-15"), "15/01/2024");
    }

    #[test]
    fn local_timestamp() {
        assert_eq!(format_date("2024-01-15T10:30:00"), "15/01/2024");
        assert_eq!(format_date("2024-01-15T10:30:00.123"), "15/01/2024");
        assert_eq!(format_date_time("2024-01-15T10:30:00"), "15/01/2024 10:30");
    }

    #[test]
    fn offset_timestamp_keeps_wall_clock() {
        assert_eq!(
            format_date_time("2024-01-15T23:05:00-04:00"),
            "15/01/2024 23:05"
        );
    }

    #[test]
    fn date_time_of_plain_date_is_midnight() {
        assert_eq!(format_date_time("2023-07-01"), "01/07/2023 00:00");
    }

    #[test]
    fn unparseable_dates_unchanged() {
        assert_eq!(format_date("ontem"), "ontem");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date_time("2024-13-45"), "2024-13-45");
    }

    #[test]
    fn phone_ten_digits() {
        assert_eq!(format_phone("6533334444"), "(65) 3333-4444");
    }

    #[test]
    fn phone_eleven_digits() {
        assert_eq!(format_phone("65999999999"), "(65) 99999-9999");
        assert_eq!(format_phone("65 9 9999-9999"), "(65) 99999-9999");
    }

    #[test]
    fn phone_other_lengths_unchanged() {
        assert_eq!(format_phone("190"), "190");
        assert_eq!(format_phone("+55 65 99999-9999"), "+55 65 99999-9999");
    }

    #[test]
    fn mask_grows_with_input() {
        assert_eq!(mask_phone(""), "");
        assert_eq!(mask_phone("6"), "6");
        assert_eq!(mask_phone("65"), "65");
        assert_eq!(mask_phone("659"), "(65) 9");
        assert_eq!(mask_phone("659999"), "(65) 9999");
        assert_eq!(mask_phone("6599999"), "(65) 9999-9");
        assert_eq!(mask_phone("6533334444"), "(65) 3333-4444");
        assert_eq!(mask_phone("65999999999"), "(65) 99999-9999");
    }

    #[test]
    fn mask_drops_extra_digits_and_noise() {
        assert_eq!(mask_phone("(65) 99999-99991234"), "(65) 99999-9999");
        assert_eq!(mask_phone("abc"), "");
    }

    #[test]
    fn mask_is_idempotent() {
        let once = mask_phone("65999999999");
        assert_eq!(mask_phone(&once), once);
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_text("curto", 10), "curto");
        assert_eq!(truncate_text("exato", 5), "exato");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate_text("desaparecida", 4), "desa...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("ação ótima", 4), "ação...");
    }
}
