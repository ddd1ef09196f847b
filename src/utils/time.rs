
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// This is the standard way of writing a timestamp in happyfruit.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(moment: NaiveDateTime) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Reads timestamps written by the capture side. Older logs and hand-written entries may carry
/// only minutes or only a date, so those are accepted too.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, MINUTE_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Same as [parse_timestamp] but a bare date is taken as the last second of that day.
pub fn parse_range_end(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1)),
        Err(_) => parse_timestamp(value),
    }
}

pub fn timestamp_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|v| v.date())
}
