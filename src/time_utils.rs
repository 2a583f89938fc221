//! Calendar helpers for chart axes and API dates. All arithmetic is UTC;
//! callers pass the browser's offset when they want local labels.

use crate::domain::market::TimeFilter;

const MS_PER_DAY: i64 = 86_400_000;

/// Days since 1970-01-01 for a proleptic Gregorian date.
pub fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Parse `YYYY-MM-DD`, optionally followed by `T`/space, `HH:MM[:SS[.fff]]`
/// and a `Z` or `±HH:MM` offset. Returns epoch milliseconds.
pub fn parse_datetime_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    let date = text.get(0..10)?;
    let mut parts = date.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let mut millis = days_from_civil(year, month, day) * MS_PER_DAY;

    let rest = &text[10..];
    if rest.is_empty() {
        return Some(millis);
    }
    let rest = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' '))?;

    let (clock, offset_ms) = split_offset(rest)?;
    let mut fields = clock.split(':');
    let hours: i64 = fields.next()?.parse().ok()?;
    let minutes: i64 = fields.next()?.parse().ok()?;
    let seconds: f64 = match fields.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0.0,
    };
    millis += hours * 3_600_000 + minutes * 60_000 + (seconds * 1000.0).round() as i64;
    Some(millis - offset_ms)
}

fn split_offset(clock: &str) -> Option<(&str, i64)> {
    if let Some(stripped) = clock.strip_suffix('Z') {
        return Some((stripped, 0));
    }
    // Offset sign can only appear after the HH:MM part.
    match clock.get(5..).and_then(|tail| tail.rfind(['+', '-'])) {
        Some(pos) => {
            let pos = pos + 5;
            let sign = if clock.as_bytes()[pos] == b'-' { -1 } else { 1 };
            let offset = &clock[pos + 1..];
            let (h, m) = offset.split_once(':').unwrap_or((offset.get(0..2)?, offset.get(2..).unwrap_or("0")));
            let h: i64 = h.parse().ok()?;
            let m: i64 = if m.is_empty() { 0 } else { m.parse().ok()? };
            Some((&clock[..pos], sign * (h * 3_600_000 + m * 60_000)))
        }
        None => Some((clock, 0)),
    }
}

/// Start of the UTC day containing `seconds`.
pub fn utc_day_start(seconds: i64) -> i64 {
    seconds.div_euclid(86_400) * 86_400
}

/// `YYYY-MM-DD` for epoch milliseconds.
pub fn format_date(millis: i64) -> String {
    let (y, m, d) = civil_from_days(millis.div_euclid(MS_PER_DAY));
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ` for epoch milliseconds.
pub fn format_iso(millis: i64) -> String {
    let ms_of_day = millis.rem_euclid(MS_PER_DAY);
    let (h, rem) = (ms_of_day / 3_600_000, ms_of_day % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    format!("{}T{:02}:{:02}:{:02}.{:03}Z", format_date(millis), h, m, rem / 1000, rem % 1000)
}

/// Axis label for a chart point.
///
/// - intraday -> `HH:MM`
/// - otherwise -> `DD.MM.YYYY`
///
/// `offset_minutes` is added to UTC (IST is `330`).
pub fn format_axis_label(millis: i64, filter: TimeFilter, offset_minutes: i64) -> String {
    let local = millis + offset_minutes * 60_000;
    if filter.is_intraday() {
        let minutes_of_day = local.rem_euclid(MS_PER_DAY) / 60_000;
        format!("{:02}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
    } else {
        let (y, m, d) = civil_from_days(local.div_euclid(MS_PER_DAY));
        format!("{:02}.{:02}.{}", d, m, y)
    }
}
