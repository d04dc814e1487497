//! Optimal slot search across participants and time zones.

use crate::api::{AvailabilityWindow, Interval, Meeting, User};
use crate::config::SlotSearchConfig;
use crate::error::EngineError;
use crate::models::time::{
    crosses_local_midnight, fractional_hour, is_work_time, local_instant, resolve_zone,
};
use crate::services::availability::resolve_availability;
use crate::services::patterns::preferred_start_hour;
use chrono::Duration;
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};

/// Normalized [0, 1] contribution of each scoring factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub availability_margin: f64,
    pub preference_match: f64,
    pub timezone_fairness: f64,
}

/// A viable slot with its aggregate score on [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub interval: Interval,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

// The fairness factor measures distance from a standard business window
// rather than each user's configured hours, which the hard availability
// constraint has already enforced.
const STANDARD_WORK_START: f64 = 9.0;
const STANDARD_WORK_END: f64 = 17.0;
/// Hours outside the standard window at which the fairness penalty saturates.
const FAIRNESS_SATURATION_HOURS: f64 = 12.0;
/// Hour distance at which the preferred-hour proximity score reaches zero.
const PREFERRED_HOUR_SATURATION: f64 = 12.0;

struct ParticipantContext<'a> {
    user: &'a User,
    tz: Tz,
    /// Meetings and blocking windows, as plain intervals.
    busy: Vec<Interval>,
    /// Non-blocking preferred-hours windows.
    preferred: Vec<Interval>,
    /// Historical modal start hour, when history was supplied.
    preferred_hour: Option<u32>,
}

/// Find the best meeting slots for a set of participants.
///
/// Candidate starts are enumerated on the configured granularity grid
/// anchored at `date_range.start`. Candidates that cross a local midnight in
/// the reference zone are skipped, as are candidates outside every
/// participant's work hours. A candidate survives only when every
/// participant is free for it (hard constraint); survivors are scored on a
/// weighted sum of availability margin, preference match, and timezone
/// fairness, sorted by score descending with ties broken by earliest start.
///
/// An empty result is a valid outcome, not an error: it means no slot in the
/// range satisfies the hard constraint.
///
/// # Arguments
///
/// * `participants` - users who must all attend (must be non-empty)
/// * `duration_minutes` - meeting length (must be positive)
/// * `date_range` - absolute search window
/// * `timezone` - reference zone for grid/midnight handling
/// * `meetings`, `windows` - busy snapshots covering the search range
/// * `history` - optional meeting history used for preference scoring
/// * `max_results` - cap on the number of returned candidates
#[allow(clippy::too_many_arguments)]
pub fn find_slots(
    participants: &[User],
    duration_minutes: i64,
    date_range: &Interval,
    timezone: &str,
    meetings: &[Meeting],
    windows: &[AvailabilityWindow],
    history: Option<&[Meeting]>,
    config: &SlotSearchConfig,
    max_results: usize,
) -> Result<Vec<SlotCandidate>, EngineError> {
    if participants.is_empty() {
        return Err(EngineError::EmptyParticipantSet);
    }
    config.weights.validate()?;
    let reference_tz = resolve_zone(timezone)?;
    if date_range.end <= date_range.start {
        return Err(EngineError::InvalidInterval {
            start: date_range.start,
            end: date_range.end,
        });
    }
    // Also rejects non-positive durations.
    Interval::from_start_duration(date_range.start, duration_minutes)?;

    let contexts = build_contexts(participants, meetings, windows, history)?;

    let step = config.granularity_minutes.max(1);
    let mut candidates: Vec<SlotCandidate> = Vec::new();
    let mut offset = 0i64;

    loop {
        let start = date_range.start + Duration::minutes(offset);
        let end = start + Duration::minutes(duration_minutes);
        if end > date_range.end {
            break;
        }
        offset += step;

        let candidate = Interval { start, end };

        if crosses_local_midnight(&candidate, reference_tz) {
            continue;
        }

        let mut in_someones_hours = false;
        for context in &contexts {
            if is_work_time(start, context.user)? {
                in_someones_hours = true;
                break;
            }
        }
        if !in_someones_hours {
            continue;
        }

        // Hard constraint: every participant must be free.
        let mut all_free = true;
        for context in &contexts {
            let report = resolve_availability(context.user, &candidate, meetings, windows)?;
            if !report.free {
                all_free = false;
                break;
            }
        }
        if !all_free {
            continue;
        }

        let breakdown = score_candidate(&candidate, &contexts, config);
        let score = config.weights.availability * breakdown.availability_margin
            + config.weights.preference * breakdown.preference_match
            + config.weights.fairness * breakdown.timezone_fairness;

        candidates.push(SlotCandidate {
            interval: candidate,
            score,
            breakdown,
        });
    }

    debug!(
        "slot search: {} viable candidates in range for {} participants",
        candidates.len(),
        participants.len()
    );

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.interval.start.cmp(&b.interval.start))
    });
    candidates.truncate(max_results);

    Ok(candidates)
}

fn build_contexts<'a>(
    participants: &'a [User],
    meetings: &[Meeting],
    windows: &[AvailabilityWindow],
    history: Option<&[Meeting]>,
) -> Result<Vec<ParticipantContext<'a>>, EngineError> {
    participants
        .iter()
        .map(|user| {
            let tz = resolve_zone(&user.timezone)?;

            let mut busy: Vec<Interval> = meetings
                .iter()
                .filter(|m| m.involves(user.id))
                .map(|m| m.interval())
                .collect();
            busy.extend(
                windows
                    .iter()
                    .filter(|w| w.user_id == user.id && w.kind.blocks())
                    .map(|w| w.interval),
            );
            busy.sort_by_key(|b| b.start);

            let preferred: Vec<Interval> = windows
                .iter()
                .filter(|w| w.user_id == user.id && !w.kind.blocks())
                .map(|w| w.interval)
                .collect();

            let preferred_hour = match history {
                Some(past) => preferred_start_hour(user, past)?,
                None => None,
            };

            Ok(ParticipantContext {
                user,
                tz,
                busy,
                preferred,
                preferred_hour,
            })
        })
        .collect()
}

fn score_candidate(
    candidate: &Interval,
    contexts: &[ParticipantContext<'_>],
    config: &SlotSearchConfig,
) -> ScoreBreakdown {
    let n = contexts.len() as f64;

    let availability_margin = contexts
        .iter()
        .map(|c| margin_component(candidate, c, config.margin_cap_minutes))
        .sum::<f64>()
        / n;

    let preference_match = contexts
        .iter()
        .map(|c| preference_component(candidate, c))
        .sum::<f64>()
        / n;

    let timezone_fairness = 1.0
        - contexts
            .iter()
            .map(|c| fairness_penalty(candidate, c))
            .sum::<f64>()
            / n;

    ScoreBreakdown {
        availability_margin,
        preference_match,
        timezone_fairness,
    }
}

/// How far the candidate sits from the edges of the participant's free
/// block, normalized by the configured cap. The free block is bounded by the
/// day's work-hour edges and any busy interval on either side.
fn margin_component(candidate: &Interval, context: &ParticipantContext<'_>, cap: i64) -> f64 {
    let local_date = candidate.start.with_timezone(&context.tz).date_naive();

    let mut before_edge = local_instant(context.tz, local_date, context.user.work_start_hour)
        .unwrap_or(candidate.start);
    let mut after_edge = local_instant(context.tz, local_date, context.user.work_end_hour)
        .unwrap_or(candidate.end);

    for busy in &context.busy {
        if busy.end <= candidate.start {
            before_edge = before_edge.max(busy.end);
        }
        if busy.start >= candidate.end {
            after_edge = after_edge.min(busy.start);
        }
    }

    let before = (candidate.start - before_edge).num_minutes();
    let after = (after_edge - candidate.end).num_minutes();
    let margin = before.min(after).max(0);

    (margin as f64 / cap.max(1) as f64).min(1.0)
}

/// Overlap with the participant's preferred-hours windows plus proximity to
/// their historical preferred start hour. Missing signals stay neutral at
/// 0.5.
fn preference_component(candidate: &Interval, context: &ParticipantContext<'_>) -> f64 {
    let window_score = if context.preferred.is_empty() {
        0.5
    } else {
        context
            .preferred
            .iter()
            .map(|w| {
                candidate.overlap_minutes(w) as f64 / candidate.duration_minutes() as f64
            })
            .fold(0.0, f64::max)
    };

    let hour_score = match context.preferred_hour {
        Some(preferred) => {
            let local = candidate.start.with_timezone(&context.tz);
            let diff = (fractional_hour(&local) - f64::from(preferred)).abs();
            let wrapped = diff.min(24.0 - diff);
            1.0 - (wrapped / PREFERRED_HOUR_SATURATION).min(1.0)
        }
        None => 0.5,
    };

    0.5 * window_score + 0.5 * hour_score
}

/// Penalty in [0, 1] for how far the candidate falls outside the standard
/// business window in the participant's local time.
fn fairness_penalty(candidate: &Interval, context: &ParticipantContext<'_>) -> f64 {
    let local_start = candidate.start.with_timezone(&context.tz);
    let local_end = candidate.end.with_timezone(&context.tz);

    let start_hour = fractional_hour(&local_start);
    let mut end_hour = fractional_hour(&local_end);
    if local_end.date_naive() != local_start.date_naive() {
        end_hour += 24.0;
    }

    let before = (STANDARD_WORK_START - start_hour).max(0.0);
    let after = (end_hour - STANDARD_WORK_END).max(0.0);

    (before.max(after) / FAIRNESS_SATURATION_HOURS).min(1.0)
}
