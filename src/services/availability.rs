use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::client::TimeSlot;

/// Half-open availability window passed to the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    /// ISO-8601 form the availability service expects,
    /// e.g. `2026-08-09T04:00:00.000Z`.
    pub fn start_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn end_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Window from midnight of `start_date` in the display zone through
/// midnight of `start_date + days`, so the window always covers whole
/// calendar days regardless of DST shifts inside it.
pub fn booking_window(start_date: NaiveDate, tz: Tz, days: i64) -> BookingWindow {
    BookingWindow {
        start: local_midnight(start_date, tz),
        end: local_midnight(start_date + Duration::days(days), tz),
    }
}

// Midnight of `date` in `tz`. A midnight erased by a DST jump falls
// forward to the earliest valid local time that day; gaps are at most a
// couple of hours, so the scan is bounded.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut naive = date.and_time(NaiveTime::MIN);
    loop {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => naive += Duration::minutes(30),
        }
    }
}

/// One display group: the slots sharing a calendar day, under the label
/// the widget renders as the day heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlots {
    pub label: String,
    pub slots: Vec<TimeSlot>,
}

/// Partition slots by the calendar day of their start instant in the
/// display zone. Groups appear in first-seen order and each group keeps
/// the arrival order of its slots.
pub fn group_slots_by_day(slots: &[TimeSlot], tz: Tz) -> Vec<DaySlots> {
    let mut groups: Vec<DaySlots> = Vec::new();

    for slot in slots {
        let start = match DateTime::parse_from_rfc3339(&slot.start) {
            Ok(dt) => dt.with_timezone(&tz),
            Err(err) => {
                warn!("Skipping slot with unparseable start {:?}: {}", slot.start, err);
                continue;
            }
        };

        let label = day_label(&start);
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.slots.push(slot.clone()),
            None => groups.push(DaySlots {
                label,
                slots: vec![slot.clone()],
            }),
        }
    }

    groups
}

// Day heading, e.g. "Friday, August 14".
fn day_label(start: &DateTime<Tz>) -> String {
    start.format("%A, %B %-d").to_string()
}

/// Clock label for a slot button, e.g. "9:00 AM", or `None` when the
/// start instant does not parse.
pub fn slot_time_label(slot: &TimeSlot, tz: Tz) -> Option<String> {
    DateTime::parse_from_rfc3339(&slot.start)
        .ok()
        .map(|dt| dt.with_timezone(&tz).format("%-I:%M %p").to_string())
}
