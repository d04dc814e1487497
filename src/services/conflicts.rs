//! Conflict detection for a candidate interval against a user's schedule.

use crate::api::{
    AvailabilityWindow, Interval, Meeting, MeetingId, Severity, User, AvailabilityKind,
};
use crate::config::OverloadThresholds;
use crate::error::EngineError;
use crate::models::time::to_zone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a conflict was detected against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSource {
    /// Direct overlap with an existing meeting.
    Meeting {
        meeting_id: MeetingId,
        interval: Interval,
    },
    /// Overlap with a blocking availability window.
    Window {
        kind: AvailabilityKind,
        interval: Interval,
    },
    /// The candidate would push the day past the user's load limits.
    Overload {
        projected_count: usize,
        projected_minutes: i64,
    },
}

/// A single detected conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    pub severity: Severity,
    pub candidate: Interval,
    pub source: ConflictSource,
    pub reason: String,
}

impl ConflictReport {
    /// Start instant used for ordering: the conflicting interval where one
    /// exists, otherwise the candidate itself.
    fn sort_start(&self) -> DateTime<Utc> {
        match &self.source {
            ConflictSource::Meeting { interval, .. } => interval.start,
            ConflictSource::Window { interval, .. } => interval.start,
            ConflictSource::Overload { .. } => self.candidate.start,
        }
    }
}

/// Detect conflicts for scheduling `candidate` into the user's day.
///
/// Three checks run in order: direct meeting overlaps (High), blocking
/// availability windows (Medium), and day overload against the user's
/// meeting-count limit and minute budget (Low, escalating to Medium past
/// `thresholds.escalation_factor` times the limit). Reports come back sorted
/// by severity descending, then by interval start; an empty vec means the
/// candidate is conflict-free. Inputs are never mutated.
pub fn detect_conflicts(
    user: &User,
    candidate: &Interval,
    meetings: &[Meeting],
    windows: &[AvailabilityWindow],
    thresholds: &OverloadThresholds,
) -> Result<Vec<ConflictReport>, EngineError> {
    let mut reports: Vec<ConflictReport> = Vec::new();

    // 1. Direct meeting overlaps.
    for meeting in meetings {
        if meeting.involves(user.id) && meeting.interval().overlaps(candidate) {
            reports.push(ConflictReport {
                severity: Severity::High,
                candidate: *candidate,
                source: ConflictSource::Meeting {
                    meeting_id: meeting.id,
                    interval: meeting.interval(),
                },
                reason: format!("double-booked with \"{}\"", meeting.title),
            });
        }
    }

    // 2. Blocking availability windows.
    for window in windows {
        if window.user_id == user.id
            && window.kind.blocks()
            && window.interval.overlaps(candidate)
        {
            reports.push(ConflictReport {
                severity: Severity::Medium,
                candidate: *candidate,
                source: ConflictSource::Window {
                    kind: window.kind,
                    interval: window.interval,
                },
                reason: format!("unavailable: {}", window.kind),
            });
        }
    }

    // 3. Day overload.
    if let Some(report) = detect_overload(user, candidate, meetings, thresholds)? {
        reports.push(report);
    }

    reports.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(a.sort_start().cmp(&b.sort_start()))
    });

    Ok(reports)
}

/// Overload check for the candidate's local day.
///
/// The minute budget is derived from the user's work span minus the buffer
/// time reserved between the day's projected meetings.
fn detect_overload(
    user: &User,
    candidate: &Interval,
    meetings: &[Meeting],
    thresholds: &OverloadThresholds,
) -> Result<Option<ConflictReport>, EngineError> {
    let local_date = to_zone(candidate.start, &user.timezone)?.date_naive();

    let mut same_day_count = 0usize;
    let mut same_day_minutes = 0i64;
    for meeting in meetings {
        if !meeting.involves(user.id) {
            continue;
        }
        if to_zone(meeting.start, &user.timezone)?.date_naive() == local_date {
            same_day_count += 1;
            same_day_minutes += meeting.duration_minutes;
        }
    }

    let projected_count = same_day_count + 1;
    let projected_minutes = same_day_minutes + candidate.duration_minutes();

    let minute_budget =
        (user.work_span_minutes() - user.buffer_minutes * projected_count as i64).max(0);

    let count_severity = if projected_count > user.max_meetings_per_day {
        if projected_count as f64 > thresholds.escalation_factor * user.max_meetings_per_day as f64
        {
            Some(Severity::Medium)
        } else {
            Some(Severity::Low)
        }
    } else {
        None
    };

    let minutes_severity = if projected_minutes > minute_budget {
        if projected_minutes as f64 > thresholds.escalation_factor * minute_budget as f64 {
            Some(Severity::Medium)
        } else {
            Some(Severity::Low)
        }
    } else {
        None
    };

    let severity = match (count_severity, minutes_severity) {
        (None, None) => return Ok(None),
        (a, b) => a.max(b).unwrap_or(Severity::Low),
    };

    let reason = if count_severity.is_some() {
        format!(
            "would be {} meetings that day (limit: {})",
            projected_count, user.max_meetings_per_day
        )
    } else {
        format!(
            "would be {} meeting minutes that day (budget: {})",
            projected_minutes, minute_budget
        )
    };

    Ok(Some(ConflictReport {
        severity,
        candidate: *candidate,
        source: ConflictSource::Overload {
            projected_count,
            projected_minutes,
        },
        reason,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MeetingType, UserId};
    use chrono::TimeZone;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    fn create_test_user() -> User {
        User {
            id: UserId::new(1),
            name: "test".to_string(),
            timezone: "UTC".to_string(),
            work_days: vec![1, 2, 3, 4, 5],
            work_start_hour: 9,
            work_end_hour: 17,
            max_meetings_per_day: 8,
            preferred_duration_minutes: 30,
            buffer_minutes: 15,
        }
    }

    fn create_test_meeting(id: i64, start: DateTime<Utc>, minutes: i64) -> Meeting {
        Meeting {
            id: MeetingId::new(id),
            title: format!("meeting_{}", id),
            organizer: UserId::new(1),
            participants: vec![UserId::new(1)],
            start,
            duration_minutes: minutes,
            meeting_type: MeetingType::TeamMeeting,
            effectiveness_score: None,
        }
    }

    #[test]
    fn test_no_conflicts_for_clear_slot() {
        let user = create_test_user();
        // Monday 2026-03-02.
        let candidate = Interval::new(utc(2, 10, 0), utc(2, 11, 0)).unwrap();

        let reports =
            detect_conflicts(&user, &candidate, &[], &[], &OverloadThresholds::default())
                .unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_direct_overlap_is_high() {
        let user = create_test_user();
        let existing = create_test_meeting(10, utc(2, 10, 0), 60);
        let candidate = Interval::new(utc(2, 10, 30), utc(2, 11, 30)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &[existing],
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::High);
        assert!(reports[0].reason.contains("double-booked"));
    }

    #[test]
    fn test_touching_endpoint_no_conflict() {
        let user = create_test_user();
        let existing = create_test_meeting(10, utc(2, 10, 0), 60);
        // Half-open: 11:00-12:00 touches 10:00-11:00 without overlap.
        let candidate = Interval::new(utc(2, 11, 0), utc(2, 12, 0)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &[existing],
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_blocking_window_is_medium() {
        let user = create_test_user();
        let window = AvailabilityWindow {
            user_id: user.id,
            interval: Interval::new(utc(2, 10, 0), utc(2, 12, 0)).unwrap(),
            kind: AvailabilityKind::FocusTime,
        };
        let candidate = Interval::new(utc(2, 11, 0), utc(2, 11, 30)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &[],
            &[window],
            &OverloadThresholds::default(),
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Medium);
        assert!(reports[0].reason.contains("focus_time"));
    }

    #[test]
    fn test_count_overload_low_then_medium() {
        let mut user = create_test_user();
        user.max_meetings_per_day = 2;
        user.buffer_minutes = 0;

        // Two short meetings already on the day; the candidate makes three.
        let meetings = vec![
            create_test_meeting(1, utc(2, 9, 0), 30),
            create_test_meeting(2, utc(2, 12, 0), 30),
        ];
        let candidate = Interval::new(utc(2, 14, 0), utc(2, 14, 30)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &meetings,
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Low);

        // Four existing meetings project to five: past 150% of the limit.
        let meetings = vec![
            create_test_meeting(1, utc(2, 9, 0), 30),
            create_test_meeting(2, utc(2, 10, 0), 30),
            create_test_meeting(3, utc(2, 11, 0), 30),
            create_test_meeting(4, utc(2, 12, 0), 30),
        ];
        let reports = detect_conflicts(
            &user,
            &candidate,
            &meetings,
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Medium);
    }

    #[test]
    fn test_minute_overload() {
        let mut user = create_test_user();
        user.buffer_minutes = 0;

        // 7 hours already booked; a 90-minute candidate exceeds the
        // 8-hour span.
        let meetings = vec![create_test_meeting(1, utc(2, 9, 0), 420)];
        let candidate = Interval::new(utc(2, 16, 0), utc(2, 17, 30)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &meetings,
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Low);
        assert!(matches!(
            reports[0].source,
            ConflictSource::Overload {
                projected_count: 2,
                projected_minutes: 510,
            }
        ));
    }

    #[test]
    fn test_meetings_on_other_days_ignored_for_overload() {
        let mut user = create_test_user();
        user.max_meetings_per_day = 1;

        // Tuesday meetings do not count against a Monday candidate.
        let meetings = vec![
            create_test_meeting(1, utc(3, 9, 0), 30),
            create_test_meeting(2, utc(3, 10, 0), 30),
        ];
        let candidate = Interval::new(utc(2, 10, 0), utc(2, 10, 30)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &meetings,
            &[],
            &OverloadThresholds::default(),
        )
        .unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_reports_sorted_by_severity_then_start() {
        let mut user = create_test_user();
        user.max_meetings_per_day = 1;
        user.buffer_minutes = 0;

        let window = AvailabilityWindow {
            user_id: user.id,
            interval: Interval::new(utc(2, 9, 0), utc(2, 16, 0)).unwrap(),
            kind: AvailabilityKind::OutOfOffice,
        };
        let late = create_test_meeting(11, utc(2, 11, 0), 60);
        let early = create_test_meeting(10, utc(2, 9, 30), 120);
        let candidate = Interval::new(utc(2, 9, 0), utc(2, 15, 0)).unwrap();

        let reports = detect_conflicts(
            &user,
            &candidate,
            &[late, early],
            &[window],
            &OverloadThresholds::default(),
        )
        .unwrap();

        let severities: Vec<Severity> = reports.iter().map(|r| r.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(severities, sorted, "severity must be descending");

        // The two High reports keep start order.
        assert_eq!(reports[0].severity, Severity::High);
        assert!(matches!(
            reports[0].source,
            ConflictSource::Meeting { meeting_id: MeetingId(10), .. }
        ));
        assert!(matches!(
            reports[1].source,
            ConflictSource::Meeting { meeting_id: MeetingId(11), .. }
        ));
    }

    #[test]
    fn test_invalid_zone_fails_before_reporting() {
        let mut user = create_test_user();
        user.timezone = "Nowhere/Void".to_string();
        let candidate = Interval::new(utc(2, 10, 0), utc(2, 11, 0)).unwrap();

        assert!(matches!(
            detect_conflicts(&user, &candidate, &[], &[], &OverloadThresholds::default()),
            Err(EngineError::InvalidTimeZone(_))
        ));
    }
}
