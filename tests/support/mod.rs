//! Shared fixture builders for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use meetwise::api::{
    AvailabilityKind, AvailabilityWindow, Interval, Meeting, MeetingId, MeetingType, User, UserId,
};

/// Monday 2026-03-02 at the given wall-clock time, UTC.
pub fn monday_utc(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

/// A day offset from Monday 2026-03-02.
pub fn day_utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

pub fn build_user(id: i64, timezone: &str) -> User {
    User {
        id: UserId::new(id),
        name: format!("user_{}", id),
        timezone: timezone.to_string(),
        work_days: vec![1, 2, 3, 4, 5],
        work_start_hour: 9,
        work_end_hour: 17,
        max_meetings_per_day: 8,
        preferred_duration_minutes: 30,
        buffer_minutes: 15,
    }
}

pub fn build_meeting(
    id: i64,
    participants: &[UserId],
    start: DateTime<Utc>,
    duration_minutes: i64,
) -> Meeting {
    Meeting {
        id: MeetingId::new(id),
        title: format!("meeting_{}", id),
        organizer: participants[0],
        participants: participants.to_vec(),
        start,
        duration_minutes,
        meeting_type: MeetingType::TeamMeeting,
        effectiveness_score: None,
    }
}

pub fn build_window(
    user: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: AvailabilityKind,
) -> AvailabilityWindow {
    AvailabilityWindow {
        user_id: user,
        interval: Interval::new(start, end).unwrap(),
        kind,
    }
}
