//! Time and conflict calculator
//!
//! Durations come from the catalog (base + extension minutes); bookings are
//! half-open `[start, end)` intervals on a single business day, wrapping at
//! midnight with no calendar carry.

use crate::catalog::ServiceCatalog;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::models::ServiceEntry;
use shared::types::ClockTime;

/// Total duration of a service in minutes (base + extension)
pub fn duration(catalog: &ServiceCatalog, service_name: &str, extended_minutes: u32) -> u32 {
    catalog.duration_of(service_name) + extended_minutes
}

/// End time of a service started at `start`, wrapping at 24h
pub fn end_time(
    catalog: &ServiceCatalog,
    start: ClockTime,
    service_name: &str,
    extended_minutes: u32,
) -> ClockTime {
    start.add_minutes(duration(catalog, service_name, extended_minutes))
}

/// Half-open interval overlap test
pub fn overlaps(a_start: ClockTime, a_end: ClockTime, b_start: ClockTime, b_end: ClockTime) -> bool {
    a_start < b_end && a_end > b_start
}

/// Actual or computed end of an entry
pub fn entry_end(catalog: &ServiceCatalog, entry: &ServiceEntry) -> ClockTime {
    entry
        .end_time
        .unwrap_or_else(|| end_time(catalog, entry.time, entry.service_name(), entry.extension()))
}

/// When the therapist is next free: the latest end (computed or actual)
/// across their non-scheduled entries; `now` when they have none
pub fn next_available_time(
    catalog: &ServiceCatalog,
    entries: &[ServiceEntry],
    therapist: &str,
    now: ClockTime,
) -> ClockTime {
    entries
        .iter()
        .filter(|e| e.therapist == therapist && !e.is_scheduled)
        .map(|e| entry_end(catalog, e))
        .max()
        .unwrap_or(now)
}

/// Wall-clock time of an instant in the business timezone
pub fn clock_time(at: DateTime<Utc>, tz: Tz) -> ClockTime {
    use chrono::Timelike;
    let local = at.with_timezone(&tz);
    ClockTime::new(local.hour() as u16, local.minute() as u16)
}
