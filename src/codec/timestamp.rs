use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const TIMESTAMP_LEN: usize = 14;

/// Formats an instant as `YYYYMMDDhhmmss` on the gateway's wall clock.
/// Returns `None` when that wall clock falls outside the supported calendar.
pub fn format_timestamp(at: OffsetDateTime, offset: UtcOffset) -> Option<String> {
    // Shift the wall clock ourselves; `to_offset` panics at the calendar edges.
    let shift = i64::from(offset.whole_seconds()) - i64::from(at.offset().whole_seconds());
    let local = at.checked_add(Duration::seconds(shift))?;
    Some(format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        local.year(),
        u8::from(local.month()),
        local.day(),
        local.hour(),
        local.minute(),
        local.second()
    ))
}

/// Parses a `YYYYMMDDhhmmss` timestamp given on the gateway's wall clock.
/// Malformed input yields `None`.
pub fn parse_timestamp(text: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let t = text.trim();
    if t.len() != TIMESTAMP_LEN || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = t[0..4].parse::<i32>().ok()?;
    let month = Month::try_from(t[4..6].parse::<u8>().ok()?).ok()?;
    let day = t[6..8].parse::<u8>().ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    let time = Time::from_hms(
        t[8..10].parse().ok()?,
        t[10..12].parse().ok()?,
        t[12..14].parse().ok()?,
    )
    .ok()?;

    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}
