//! Meeting workload and team balance computation.

use crate::api::{Interval, Meeting, User, UserId};
use crate::config::WorkloadConfig;
use crate::error::EngineError;
use crate::models::time::resolve_zone;
use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

/// One user's meeting load over the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWorkload {
    pub user_id: UserId,
    pub meeting_count: usize,
    pub organized_count: usize,
    pub total_minutes: i64,
    /// 0-10 load measure relative to the configured daily baseline.
    pub workload_score: f64,
}

/// Team-level workload aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub per_user: Vec<UserWorkload>,
    pub average_score: f64,
    /// 10 = perfectly even load across the team.
    pub balance_score: f64,
    pub most_loaded: UserId,
    pub least_loaded: UserId,
}

/// Compute per-user workload and team balance over an analysis window.
///
/// Only meetings starting inside the window count. The workload score is a
/// linear function of meeting minutes per local work day relative to the
/// configured baseline (baseline minutes/day maps to score 5), clamped to
/// [0, 10]. The balance score is 10 minus ten times the coefficient of
/// variation of the individual scores, clamped to [0, 10]. Ties for most- or
/// least-loaded resolve to the lowest user id.
pub fn calculate_workload(
    users: &[User],
    meetings: &[Meeting],
    window: &Interval,
    config: &WorkloadConfig,
) -> Result<WorkloadSummary, EngineError> {
    if users.is_empty() {
        return Err(EngineError::EmptyParticipantSet);
    }
    if window.end <= window.start {
        return Err(EngineError::InvalidInterval {
            start: window.start,
            end: window.end,
        });
    }

    let mut per_user: Vec<UserWorkload> = Vec::with_capacity(users.len());

    for user in users {
        let mut meeting_count = 0usize;
        let mut organized_count = 0usize;
        let mut total_minutes = 0i64;

        for meeting in meetings {
            if !meeting.involves(user.id) || !window.contains(meeting.start) {
                continue;
            }
            meeting_count += 1;
            total_minutes += meeting.duration_minutes;
            if meeting.organizer == user.id {
                organized_count += 1;
            }
        }

        let work_days = count_work_days(user, window)?;
        let workload_score = if work_days == 0 {
            0.0
        } else {
            let minutes_per_day = total_minutes as f64 / work_days as f64;
            (5.0 * minutes_per_day / config.daily_baseline_minutes).clamp(0.0, 10.0)
        };

        per_user.push(UserWorkload {
            user_id: user.id,
            meeting_count,
            organized_count,
            total_minutes,
            workload_score,
        });
    }

    let scores: Vec<f64> = per_user.iter().map(|u| u.workload_score).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let variance = scores
        .iter()
        .map(|s| {
            let diff = s - mean;
            diff * diff
        })
        .sum::<f64>()
        / scores.len() as f64;
    let std_dev = variance.sqrt();

    let balance_score = if mean == 0.0 {
        10.0
    } else {
        (10.0 - (std_dev / mean) * 10.0).clamp(0.0, 10.0)
    };

    let most_loaded = extreme_user(&per_user, |a, b| a > b);
    let least_loaded = extreme_user(&per_user, |a, b| a < b);

    Ok(WorkloadSummary {
        per_user,
        average_score: mean,
        balance_score,
        most_loaded,
        least_loaded,
    })
}

/// Number of the user's local work days touched by the window.
fn count_work_days(user: &User, window: &Interval) -> Result<usize, EngineError> {
    let tz = resolve_zone(&user.timezone)?;
    let first = window.start.with_timezone(&tz).date_naive();
    // The end bound is exclusive, so back off one second for the last date.
    let last = (window.end - Duration::seconds(1))
        .with_timezone(&tz)
        .date_naive();

    let mut count = 0usize;
    let mut date = first;
    while date <= last {
        if user.is_work_day(date.weekday()) {
            count += 1;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    Ok(count)
}

/// Pick the user winning the comparison on score; ties go to the lowest id.
fn extreme_user(per_user: &[UserWorkload], wins: impl Fn(f64, f64) -> bool) -> UserId {
    let mut best = &per_user[0];
    for entry in &per_user[1..] {
        if wins(entry.workload_score, best.workload_score)
            || (entry.workload_score == best.workload_score && entry.user_id < best.user_id)
        {
            best = entry;
        }
    }
    best.user_id
}
