use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

// ── Export timestamp formats ──────────────────────────────────────────────────

/// Date format of 12-hour exports (two-digit year).
pub const SHORT_DATE_FORMAT: &str = "%d/%m/%y";
/// Date format of normalized exports (four-digit year).
pub const FULL_DATE_FORMAT: &str = "%d/%m/%Y";
/// Time format of 12-hour exports.
pub const MERIDIEM_TIME_FORMAT: &str = "%I:%M %p";
/// Time format of normalized exports.
pub const CLOCK_TIME_FORMAT: &str = "%H:%M";

/// Primary format of a normalized message prefix (without the `" - "`).
const PREFIX_FORMAT: &str = "%d/%m/%Y, %H:%M";
/// Fallback for 24-hour exports that still carry a two-digit year.
const PREFIX_FALLBACK_FORMAT: &str = "%d/%m/%y, %H:%M";

/// Separator between the timestamp and the rest of a line.
pub const PREFIX_SEPARATOR: &str = " - ";

/// English weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ── 12-hour → 24-hour normalization ───────────────────────────────────────────

/// Rewrite one export line from the 12-hour form into the 24-hour form.
///
/// `"15/03/23, 9:05 pm - Alice: Hi"` becomes `"15/03/2023, 21:05 - Alice: Hi"`.
/// Any line that does not have that exact shape is returned unchanged, which
/// makes the function idempotent on already-normalized lines.
pub fn normalize_line(line: &str) -> String {
    convert_line(line).unwrap_or_else(|| line.to_string())
}

fn convert_line(line: &str) -> Option<String> {
    let (timestamp, rest) = line.split_once(PREFIX_SEPARATOR)?;

    let mut parts = timestamp.split(", ");
    let (date, time) = match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), None) => (date, time),
        _ => return None,
    };

    let date = NaiveDate::parse_from_str(date, SHORT_DATE_FORMAT).ok()?;
    let time = parse_meridiem_time(time)?;

    Some(format!(
        "{}, {}{}{}",
        date.format(FULL_DATE_FORMAT),
        time.format(CLOCK_TIME_FORMAT),
        PREFIX_SEPARATOR,
        rest
    ))
}

/// Parse `"9:05 pm"`, `"09:05 PM"` or `"9:05\u{202f}pm"` into a [`NaiveTime`].
pub fn parse_meridiem_time(token: &str) -> Option<NaiveTime> {
    let cleaned = token.replace(['\u{202f}', '\u{a0}'], " ");
    let cleaned = cleaned.trim().to_uppercase();
    NaiveTime::parse_from_str(&cleaned, MERIDIEM_TIME_FORMAT).ok()
}

// ── Prefix timestamps ─────────────────────────────────────────────────────────

/// Parse a normalized message prefix such as `"15/03/2023, 21:05"`.
///
/// The four-digit-year form is the primary format. A prefix whose year has
/// at most two digits is read with the two-digit-year fallback, since `%Y`
/// would otherwise accept `"23"` as the year 23.
pub fn parse_prefix_timestamp(prefix: &str) -> Option<NaiveDateTime> {
    let prefix = prefix.trim().trim_end_matches('-').trim_end();
    let short_year = prefix
        .split(", ")
        .next()
        .and_then(|date| date.rsplit('/').next())
        .is_some_and(|year| year.len() <= 2);

    let format = if short_year {
        PREFIX_FALLBACK_FORMAT
    } else {
        PREFIX_FORMAT
    };
    NaiveDateTime::parse_from_str(prefix, format).ok()
}

// ── Calendar labels ───────────────────────────────────────────────────────────

/// English name of `weekday`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// English name of a 1-based month number; `""` when out of range.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

/// Hour-of-day bucket label: `"00-1"`, `"9-10"`, `"23-00"`.
pub fn hour_period(hour: u32) -> String {
    match hour {
        23 => "23-00".to_string(),
        0 => "00-1".to_string(),
        h => format!("{}-{}", h, h + 1),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
