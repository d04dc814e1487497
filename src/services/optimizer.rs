//! Schedule review and optimization recommendations for a single user.

use crate::api::{Meeting, MeetingId, Severity, User};
use crate::error::EngineError;
use crate::models::time::{is_work_time, to_zone};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of a schedule recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    BufferTime,
    WorkloadBalance,
    TimingOptimization,
}

/// A single schedule improvement suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Severity,
    pub description: String,
}

/// A pair of meetings with too little room between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackToBackPair {
    pub first: MeetingId,
    pub second: MeetingId,
    /// Minutes between the first meeting's end and the second's start; can
    /// be negative when they overlap.
    pub gap_minutes: i64,
}

/// A day carrying more meetings than the user's limits allow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeavyDay {
    pub date: NaiveDate,
    pub meeting_count: usize,
    pub total_minutes: i64,
}

/// Review result: findings plus an overall 0-10 schedule score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReview {
    pub schedule_score: f64,
    pub recommendations: Vec<Recommendation>,
    pub back_to_back: Vec<BackToBackPair>,
    pub heavy_days: Vec<HeavyDay>,
    pub off_hours_count: usize,
}

const BACK_TO_BACK_PENALTY: f64 = 0.5;
const HEAVY_DAY_PENALTY: f64 = 1.0;
const OFF_HOURS_PENALTY: f64 = 0.3;

/// Review a user's schedule from `reference` onwards.
///
/// Flags meeting pairs with less than `buffer_minutes` between them, days
/// exceeding the user's meeting-count limit or work span, and meetings
/// starting outside work hours; each class of finding produces one
/// prioritized recommendation. The schedule score starts at 10 and loses a
/// fixed penalty per finding, floored at 0.
pub fn review_schedule(
    user: &User,
    meetings: &[Meeting],
    reference: DateTime<Utc>,
) -> Result<ScheduleReview, EngineError> {
    let mut upcoming: Vec<&Meeting> = meetings
        .iter()
        .filter(|m| m.involves(user.id) && m.start >= reference)
        .collect();
    upcoming.sort_by_key(|m| m.start);

    let mut back_to_back: Vec<BackToBackPair> = Vec::new();
    for pair in upcoming.windows(2) {
        let gap = (pair[1].start - pair[0].end()).num_minutes();
        if gap < user.buffer_minutes {
            back_to_back.push(BackToBackPair {
                first: pair[0].id,
                second: pair[1].id,
                gap_minutes: gap,
            });
        }
    }

    let mut daily: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
    let mut off_hours_count = 0usize;
    for meeting in &upcoming {
        let date = to_zone(meeting.start, &user.timezone)?.date_naive();
        let entry = daily.entry(date).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += meeting.duration_minutes;

        if !is_work_time(meeting.start, user)? {
            off_hours_count += 1;
        }
    }

    let heavy_days: Vec<HeavyDay> = daily
        .into_iter()
        .filter(|(_, (count, minutes))| {
            *count > user.max_meetings_per_day || *minutes > user.work_span_minutes()
        })
        .map(|(date, (meeting_count, total_minutes))| HeavyDay {
            date,
            meeting_count,
            total_minutes,
        })
        .collect();

    let mut recommendations: Vec<Recommendation> = Vec::new();
    if !back_to_back.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::BufferTime,
            priority: Severity::High,
            description: format!(
                "{} meeting pairs have less than {} minutes between them; add buffer time",
                back_to_back.len(),
                user.buffer_minutes
            ),
        });
    }
    if !heavy_days.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::WorkloadBalance,
            priority: Severity::Medium,
            description: format!(
                "{} days carry a heavy meeting load; spread meetings across the week",
                heavy_days.len()
            ),
        });
    }
    if off_hours_count > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::TimingOptimization,
            priority: Severity::Medium,
            description: format!(
                "{} meetings start outside work hours; consider rescheduling into {}-{}",
                off_hours_count, user.work_start_hour, user.work_end_hour
            ),
        });
    }

    let schedule_score = (10.0
        - BACK_TO_BACK_PENALTY * back_to_back.len() as f64
        - HEAVY_DAY_PENALTY * heavy_days.len() as f64
        - OFF_HOURS_PENALTY * off_hours_count as f64)
        .max(0.0);

    Ok(ScheduleReview {
        schedule_score,
        recommendations,
        back_to_back,
        heavy_days,
        off_hours_count,
    })
}
