//! Public API surface for the scheduling engine.
//!
//! This file consolidates the entity records consumed by the engine and
//! re-exports the result types produced by the service layer. All types
//! derive Serialize/Deserialize for JSON serialization.

pub use crate::services::availability::AvailabilityReport;
pub use crate::services::availability::BusyInterval;
pub use crate::services::availability::BusySource;
pub use crate::services::conflicts::ConflictReport;
pub use crate::services::conflicts::ConflictSource;
pub use crate::services::effectiveness::EffectivenessReport;
pub use crate::services::optimizer::BackToBackPair;
pub use crate::services::optimizer::HeavyDay;
pub use crate::services::optimizer::Recommendation;
pub use crate::services::optimizer::RecommendationKind;
pub use crate::services::optimizer::ScheduleReview;
pub use crate::services::patterns::DayOfWeekCount;
pub use crate::services::patterns::DurationStats;
pub use crate::services::patterns::PatternSummary;
pub use crate::services::patterns::TimeOfDayHistogram;
pub use crate::services::patterns::TrendDirection;
pub use crate::services::patterns::TypeCount;
pub use crate::services::slots::ScoreBreakdown;
pub use crate::services::slots::SlotCandidate;
pub use crate::services::workload::UserWorkload;
pub use crate::services::workload::WorkloadSummary;

use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// User identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

/// Meeting identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MeetingId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl MeetingId {
    pub fn new(value: i64) -> Self {
        MeetingId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for MeetingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Meeting category, used for duration-fit scoring and pattern breakdowns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    TeamMeeting,
    OneOnOne,
    ClientMeeting,
    Other,
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MeetingType::TeamMeeting => "team_meeting",
            MeetingType::OneOnOne => "one_on_one",
            MeetingType::ClientMeeting => "client_meeting",
            MeetingType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Kind of availability window. `OutOfOffice` and `FocusTime` block
/// scheduling; `PreferredHours` only biases slot scoring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityKind {
    OutOfOffice,
    FocusTime,
    PreferredHours,
}

impl AvailabilityKind {
    /// Whether a window of this kind makes the user busy.
    pub fn blocks(&self) -> bool {
        !matches!(self, AvailabilityKind::PreferredHours)
    }
}

impl std::fmt::Display for AvailabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AvailabilityKind::OutOfOffice => "out_of_office",
            AvailabilityKind::FocusTime => "focus_time",
            AvailabilityKind::PreferredHours => "preferred_hours",
        };
        write!(f, "{}", name)
    }
}

/// Conflict impact level, ordered so that `Low < Medium < High`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Half-open time interval `[start, end)` in absolute time.
///
/// Adjacent intervals sharing an endpoint never overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create a new interval, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval from a start instant and a positive duration.
    pub fn from_start_duration(
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Self, EngineError> {
        Self::new(start, start + Duration::minutes(duration_minutes))
    }

    /// Half-open overlap test: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check whether an instant lies inside this interval (start inclusive,
    /// end exclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Length of the interval in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Minutes shared with another interval, zero when disjoint.
    pub fn overlap_minutes(&self, other: &Self) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            (end - start).num_minutes()
        } else {
            0
        }
    }
}

/// A user of the scheduling system with working-hours preferences.
///
/// `work_days` holds ISO weekday numbers (1 = Monday .. 7 = Sunday).
/// Work hours are expressed in the user's own time zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// IANA zone name, e.g. "America/New_York".
    pub timezone: String,
    pub work_days: Vec<u8>,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub max_meetings_per_day: usize,
    pub preferred_duration_minutes: i64,
    pub buffer_minutes: i64,
}

impl User {
    /// Check whether a weekday is one of the user's work days.
    pub fn is_work_day(&self, weekday: Weekday) -> bool {
        let iso = weekday.number_from_monday() as u8;
        self.work_days.contains(&iso)
    }

    /// Length of the configured work day in minutes.
    pub fn work_span_minutes(&self) -> i64 {
        (self.work_end_hour as i64 - self.work_start_hour as i64) * 60
    }
}

/// A scheduled or historical meeting.
///
/// The end instant is always derived from `start + duration_minutes`; it is
/// never stored independently, so the two cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub organizer: UserId,
    pub participants: Vec<UserId>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub meeting_type: MeetingType,
    /// 0-10 scale, present once the meeting has been scored.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub effectiveness_score: Option<f64>,
}

impl Meeting {
    /// Derived end instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// The meeting's half-open interval `[start, start + duration)`.
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end(),
        }
    }

    /// Whether the user attends this meeting. The organizer counts as a
    /// participant even when not listed explicitly.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.organizer == user_id || self.participants.contains(&user_id)
    }
}

/// A user's explicit availability window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub user_id: UserId,
    pub interval: Interval,
    pub kind: AvailabilityKind,
}
