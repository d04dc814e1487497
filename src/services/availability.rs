//! Availability resolution for a single user and candidate interval.

use crate::api::{AvailabilityKind, AvailabilityWindow, Interval, Meeting, MeetingId, User};
use crate::error::EngineError;
use crate::models::time::interval_within_work_hours;
use serde::{Deserialize, Serialize};

/// Origin of a busy interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusySource {
    Meeting(MeetingId),
    Window(AvailabilityKind),
}

/// A busy interval overlapping the candidate, tagged with its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyInterval {
    pub interval: Interval,
    pub source: BusySource,
}

/// Result of resolving a user's availability for a candidate interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// True when nothing blocks the candidate and it sits fully inside the
    /// user's work hours.
    pub free: bool,
    /// Busy intervals overlapping the candidate, sorted by start.
    pub busy: Vec<BusyInterval>,
}

/// Resolve whether a user is free for a candidate interval.
///
/// Busy sources are meetings the user participates in and the user's
/// `OutOfOffice`/`FocusTime` windows; `PreferredHours` windows never block.
/// The user is also unavailable when the candidate is not fully contained in
/// a single local work day (a candidate straddling the work-hours boundary is
/// unavailable).
pub fn resolve_availability(
    user: &User,
    candidate: &Interval,
    meetings: &[Meeting],
    windows: &[AvailabilityWindow],
) -> Result<AvailabilityReport, EngineError> {
    let mut busy: Vec<BusyInterval> = Vec::new();

    for meeting in meetings {
        if meeting.involves(user.id) && meeting.interval().overlaps(candidate) {
            busy.push(BusyInterval {
                interval: meeting.interval(),
                source: BusySource::Meeting(meeting.id),
            });
        }
    }

    for window in windows {
        if window.user_id == user.id
            && window.kind.blocks()
            && window.interval.overlaps(candidate)
        {
            busy.push(BusyInterval {
                interval: window.interval,
                source: BusySource::Window(window.kind),
            });
        }
    }

    busy.sort_by_key(|b| b.interval.start);

    let within_hours = interval_within_work_hours(candidate, user)?;

    Ok(AvailabilityReport {
        free: busy.is_empty() && within_hours,
        busy,
    })
}
