use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Formats a timestamp in Japan Standard Time, e.g. `2023/11/15 07:13`.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(jst) => value.with_timezone(&jst).format("%Y/%m/%d %H:%M").to_string(),
        None => value.format("%Y/%m/%d %H:%M UTC").to_string(),
    }
}

#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[must_use]
pub fn format_minutes(value: f64) -> String {
    format!("{value:.1}分")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rccm_core::time::fixed_now;

    #[test]
    fn formats_in_japan_time() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_datetime(fixed_now()), "2023/11/15 07:13");
    }

    #[test]
    fn formats_one_decimal() {
        assert_eq!(format_percent(66.66), "66.7%");
        assert_eq!(format_minutes(3.0), "3.0分");
    }
}
