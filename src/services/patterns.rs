//! Historical meeting pattern analysis for a single user.
//!
//! Everything here is recomputed from the meeting history supplied on each
//! call; the engine accumulates nothing between calls.

use crate::api::{Interval, Meeting, MeetingType, User};
use crate::error::EngineError;
use crate::models::time::resolve_zone;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum change in mean effectiveness between the two period halves for
/// the trend to leave "stable".
pub const TREND_THRESHOLD: f64 = 0.3;

/// Direction of the effectiveness trend across the analysis period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

/// Meeting count for one meeting type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub meeting_type: MeetingType,
    pub count: usize,
}

/// Meeting count for one ISO weekday (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOfWeekCount {
    pub iso_weekday: u8,
    pub count: usize,
}

/// Counts of meetings by local time of day.
///
/// Morning is [00, 12), afternoon [12, 17), evening [17, 24), bucketed by
/// each meeting's start hour in the user's zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeOfDayHistogram {
    pub morning: usize,
    pub afternoon: usize,
    pub evening: usize,
}

/// Summary statistics over meeting durations, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Complete pattern analysis for one user over one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSummary {
    pub total_meetings: usize,
    pub period_days: i64,
    pub meetings_per_day: f64,
    pub by_type: Vec<TypeCount>,
    pub by_weekday: Vec<DayOfWeekCount>,
    pub time_of_day: TimeOfDayHistogram,
    pub duration_stats: DurationStats,
    /// Modal local start hour, ties resolved to the earliest hour.
    pub preferred_start_hour: Option<u32>,
    /// Mean effectiveness over scored meetings in the period.
    pub mean_effectiveness: Option<f64>,
    pub trend: TrendDirection,
}

/// Compute summary statistics for a set of values.
fn compute_duration_stats(values: &[f64]) -> DurationStats {
    if values.is_empty() {
        return DurationStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    DurationStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
    }
}

/// Modal local start hour across the given meetings, ties resolved to the
/// earliest hour.
fn modal_start_hour<'a, I>(meetings: I, tz: Tz) -> Option<u32>
where
    I: IntoIterator<Item = &'a Meeting>,
{
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for meeting in meetings {
        let hour = meeting.start.with_timezone(&tz).hour();
        *counts.entry(hour).or_insert(0) += 1;
    }

    let mut best: Option<(u32, usize)> = None;
    for (hour, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((hour, count)),
        }
    }
    best.map(|(hour, _)| hour)
}

/// The user's historically preferred meeting start hour, derived from the
/// meetings they attended. Consumed by the slot finder's preference factor.
pub fn preferred_start_hour(
    user: &User,
    meetings: &[Meeting],
) -> Result<Option<u32>, EngineError> {
    let tz = resolve_zone(&user.timezone)?;
    Ok(modal_start_hour(
        meetings.iter().filter(|m| m.involves(user.id)),
        tz,
    ))
}

/// Analyze a user's meeting patterns over the `period_days` ending at
/// `period_end`.
///
/// The reference instant is explicit so results are reproducible; the engine
/// never consults the system clock. Meetings outside the window or not
/// involving the user are ignored. An empty history is a valid input and
/// yields an all-zero summary with a stable trend.
pub fn analyze_patterns(
    user: &User,
    meetings: &[Meeting],
    period_end: DateTime<Utc>,
    period_days: i64,
) -> Result<PatternSummary, EngineError> {
    let window = Interval::new(period_end - Duration::days(period_days), period_end)?;
    let tz = resolve_zone(&user.timezone)?;

    let mine: Vec<&Meeting> = meetings
        .iter()
        .filter(|m| m.involves(user.id) && window.contains(m.start))
        .collect();

    let mut type_counts: BTreeMap<MeetingType, usize> = BTreeMap::new();
    let mut weekday_counts: BTreeMap<u8, usize> = BTreeMap::new();
    let mut time_of_day = TimeOfDayHistogram::default();

    for meeting in &mine {
        *type_counts.entry(meeting.meeting_type).or_insert(0) += 1;

        let local = meeting.start.with_timezone(&tz);
        let iso = local.weekday().number_from_monday() as u8;
        *weekday_counts.entry(iso).or_insert(0) += 1;

        match local.hour() {
            0..=11 => time_of_day.morning += 1,
            12..=16 => time_of_day.afternoon += 1,
            _ => time_of_day.evening += 1,
        }
    }

    let durations: Vec<f64> = mine.iter().map(|m| m.duration_minutes as f64).collect();

    let scored: Vec<(&&Meeting, f64)> = mine
        .iter()
        .filter_map(|m| m.effectiveness_score.map(|s| (m, s)))
        .collect();
    let mean_effectiveness = if scored.is_empty() {
        None
    } else {
        Some(scored.iter().map(|(_, s)| s).sum::<f64>() / scored.len() as f64)
    };

    let trend = compute_trend(&scored, &window);

    Ok(PatternSummary {
        total_meetings: mine.len(),
        period_days,
        meetings_per_day: mine.len() as f64 / period_days as f64,
        by_type: type_counts
            .into_iter()
            .map(|(meeting_type, count)| TypeCount {
                meeting_type,
                count,
            })
            .collect(),
        by_weekday: weekday_counts
            .into_iter()
            .map(|(iso_weekday, count)| DayOfWeekCount { iso_weekday, count })
            .collect(),
        time_of_day,
        duration_stats: compute_duration_stats(&durations),
        preferred_start_hour: modal_start_hour(mine.iter().copied(), tz),
        mean_effectiveness,
        trend,
    })
}

/// Compare mean effectiveness between the first and second half of the
/// window. Halves without any scored meeting leave the trend stable.
fn compute_trend(scored: &[(&&Meeting, f64)], window: &Interval) -> TrendDirection {
    let midpoint = window.start + (window.end - window.start) / 2;

    let first: Vec<f64> = scored
        .iter()
        .filter(|(m, _)| m.start < midpoint)
        .map(|(_, s)| *s)
        .collect();
    let second: Vec<f64> = scored
        .iter()
        .filter(|(m, _)| m.start >= midpoint)
        .map(|(_, s)| *s)
        .collect();

    if first.is_empty() || second.is_empty() {
        return TrendDirection::Stable;
    }

    let first_mean = first.iter().sum::<f64>() / first.len() as f64;
    let second_mean = second.iter().sum::<f64>() / second.len() as f64;
    let delta = second_mean - first_mean;

    if delta > TREND_THRESHOLD {
        TrendDirection::Improving
    } else if delta < -TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}
