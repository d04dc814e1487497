//! Meeting effectiveness scoring.

use crate::api::{Meeting, MeetingType, User};
use crate::config::EffectivenessConfig;
use crate::error::EngineError;
use crate::models::time::{fractional_hour, to_zone};
use serde::{Deserialize, Serialize};

/// Effectiveness rating for a single meeting, with the factor breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivenessReport {
    /// Aggregate score on a 0-10 scale.
    pub score: f64,
    /// Duration-fit factor on [0, 1].
    pub duration_fit: f64,
    /// Timing factor on [0, 1].
    pub timing: f64,
    /// Mean engagement on [0, 1]; absent when no engagement data was
    /// supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
}

/// Hours from the nearest productive window at which the timing factor
/// reaches zero.
const TIMING_FALLOFF_HOURS: f64 = 6.0;

/// Ideal duration range in minutes for a meeting type.
fn ideal_duration_range(meeting_type: MeetingType) -> (f64, f64) {
    match meeting_type {
        MeetingType::OneOnOne => (15.0, 30.0),
        MeetingType::TeamMeeting => (30.0, 60.0),
        MeetingType::ClientMeeting => (45.0, 90.0),
        MeetingType::Other => (30.0, 60.0),
    }
}

/// Score how well the duration matches the type-specific ideal range: 1.0
/// inside the range, degrading linearly to 0 at zero duration below it and
/// at twice the upper bound above it.
fn duration_fit_factor(meeting_type: MeetingType, duration_minutes: i64) -> f64 {
    let (lo, hi) = ideal_duration_range(meeting_type);
    let duration = duration_minutes as f64;

    if duration < lo {
        (duration / lo).max(0.0)
    } else if duration > hi {
        (1.0 - (duration - hi) / hi).max(0.0)
    } else {
        1.0
    }
}

/// Score the start time against the organizer-local productive windows: 1.0
/// inside a window, degrading linearly with distance to the nearest one.
fn timing_factor(
    meeting: &Meeting,
    organizer: &User,
    config: &EffectivenessConfig,
) -> Result<f64, EngineError> {
    let local = to_zone(meeting.start, &organizer.timezone)?;
    let hour = fractional_hour(&local);

    let mut nearest = f64::INFINITY;
    for window in &config.productive_windows {
        let start = f64::from(window.start);
        let end = f64::from(window.end);
        if hour >= start && hour < end {
            return Ok(1.0);
        }
        let distance = if hour < start { start - hour } else { hour - end };
        nearest = nearest.min(distance);
    }

    if nearest.is_infinite() {
        return Ok(0.0);
    }
    Ok((1.0 - nearest / TIMING_FALLOFF_HOURS).max(0.0))
}

/// Rate a meeting on a 0-10 scale from duration fit, timing, and engagement.
///
/// `engagement` holds one 0-1 value per participant who reported one; when
/// it is empty the engagement factor is omitted and the remaining weights
/// are renormalized so they still sum to one. Identical inputs always
/// produce the identical score.
pub fn score_meeting(
    meeting: &Meeting,
    organizer: &User,
    engagement: &[f64],
    config: &EffectivenessConfig,
) -> Result<EffectivenessReport, EngineError> {
    config.weights.validate()?;

    let duration_fit = duration_fit_factor(meeting.meeting_type, meeting.duration_minutes);
    let timing = timing_factor(meeting, organizer, config)?;

    let engagement_mean = if engagement.is_empty() {
        None
    } else {
        let mean = engagement.iter().sum::<f64>() / engagement.len() as f64;
        Some(mean.clamp(0.0, 1.0))
    };

    let weights = &config.weights;
    let normalized = match engagement_mean {
        Some(mean) => {
            weights.duration * duration_fit + weights.timing * timing + weights.engagement * mean
        }
        None => {
            let remaining = weights.duration + weights.timing;
            if remaining <= 0.0 {
                0.0
            } else {
                (weights.duration * duration_fit + weights.timing * timing) / remaining
            }
        }
    };

    Ok(EffectivenessReport {
        score: normalized * 10.0,
        duration_fit,
        timing,
        engagement: engagement_mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MeetingId, UserId};
    use chrono::{DateTime, TimeZone, Utc};

    fn create_test_user(timezone: &str) -> User {
        User {
            id: UserId::new(1),
            name: "organizer".to_string(),
            timezone: timezone.to_string(),
            work_days: vec![1, 2, 3, 4, 5],
            work_start_hour: 9,
            work_end_hour: 17,
            max_meetings_per_day: 8,
            preferred_duration_minutes: 30,
            buffer_minutes: 15,
        }
    }

    fn create_test_meeting(
        start: DateTime<Utc>,
        minutes: i64,
        meeting_type: MeetingType,
    ) -> Meeting {
        Meeting {
            id: MeetingId::new(1),
            title: "retro".to_string(),
            organizer: UserId::new(1),
            participants: vec![UserId::new(1), UserId::new(2)],
            start,
            duration_minutes: minutes,
            meeting_type,
            effectiveness_score: None,
        }
    }

    fn utc_mon(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn test_duration_fit_inside_range() {
        assert_eq!(duration_fit_factor(MeetingType::OneOnOne, 20), 1.0);
        assert_eq!(duration_fit_factor(MeetingType::TeamMeeting, 45), 1.0);
        assert_eq!(duration_fit_factor(MeetingType::ClientMeeting, 90), 1.0);
    }

    #[test]
    fn test_duration_fit_degrades_linearly() {
        // Below range: 15 min for a 30-60 team meeting is half the lower
        // bound.
        assert!((duration_fit_factor(MeetingType::TeamMeeting, 15) - 0.5).abs() < 1e-9);
        // Above range: 90 min is halfway to the zero point at 120.
        assert!((duration_fit_factor(MeetingType::TeamMeeting, 90) - 0.5).abs() < 1e-9);
        // Floor at zero.
        assert_eq!(duration_fit_factor(MeetingType::TeamMeeting, 300), 0.0);
    }

    #[test]
    fn test_timing_peak_in_productive_window() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();
        let meeting = create_test_meeting(utc_mon(10, 0), 45, MeetingType::TeamMeeting);

        let report = score_meeting(&meeting, &user, &[], &config).unwrap();
        assert_eq!(report.timing, 1.0);
    }

    #[test]
    fn test_timing_degrades_at_day_edges() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();

        // 07:00 is two hours before the 9-12 window.
        let early = create_test_meeting(utc_mon(7, 0), 45, MeetingType::TeamMeeting);
        let report = score_meeting(&early, &user, &[], &config).unwrap();
        assert!((report.timing - (1.0 - 2.0 / 6.0)).abs() < 1e-9);

        // 22:00 is six hours past the 13-16 window.
        let late = create_test_meeting(utc_mon(22, 0), 45, MeetingType::TeamMeeting);
        let report = score_meeting(&late, &user, &[], &config).unwrap();
        assert_eq!(report.timing, 0.0);
    }

    #[test]
    fn test_timing_uses_organizer_zone() {
        // 05:00 UTC is 10:00 in Karachi.
        let user = create_test_user("Asia/Karachi");
        let config = EffectivenessConfig::default();
        let meeting = create_test_meeting(utc_mon(5, 0), 45, MeetingType::TeamMeeting);

        let report = score_meeting(&meeting, &user, &[], &config).unwrap();
        assert_eq!(report.timing, 1.0);
    }

    #[test]
    fn test_engagement_mean() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();
        let meeting = create_test_meeting(utc_mon(10, 0), 45, MeetingType::TeamMeeting);

        let report = score_meeting(&meeting, &user, &[0.8, 0.6], &config).unwrap();
        assert_eq!(report.engagement, Some(0.7));
        // All three factors at play: 0.4*1 + 0.3*1 + 0.3*0.7 = 0.91.
        assert!((report.score - 9.1).abs() < 1e-9);
    }

    #[test]
    fn test_missing_engagement_renormalizes() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();
        let meeting = create_test_meeting(utc_mon(10, 0), 45, MeetingType::TeamMeeting);

        let report = score_meeting(&meeting, &user, &[], &config).unwrap();
        assert_eq!(report.engagement, None);
        // Both remaining factors are 1.0, so renormalization yields a
        // perfect score.
        assert!((report.score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_deterministic() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();
        let meeting = create_test_meeting(utc_mon(14, 30), 50, MeetingType::ClientMeeting);

        let a = score_meeting(&meeting, &user, &[0.4, 0.9, 0.7], &config).unwrap();
        let b = score_meeting(&meeting, &user, &[0.4, 0.9, 0.7], &config).unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.duration_fit, b.duration_fit);
        assert_eq!(a.timing, b.timing);
        assert_eq!(a.engagement, b.engagement);
    }

    #[test]
    fn test_score_bounds() {
        let user = create_test_user("UTC");
        let config = EffectivenessConfig::default();

        // Worst case: terrible duration, worst hour, zero engagement.
        let bad = create_test_meeting(utc_mon(22, 0), 300, MeetingType::OneOnOne);
        let report = score_meeting(&bad, &user, &[0.0], &config).unwrap();
        assert!(report.score >= 0.0);

        let good = create_test_meeting(utc_mon(10, 0), 25, MeetingType::OneOnOne);
        let report = score_meeting(&good, &user, &[1.0], &config).unwrap();
        assert!(report.score <= 10.0);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let user = create_test_user("UTC");
        let mut config = EffectivenessConfig::default();
        config.weights.duration = 0.9;
        let meeting = create_test_meeting(utc_mon(10, 0), 45, MeetingType::TeamMeeting);

        assert!(matches!(
            score_meeting(&meeting, &user, &[], &config),
            Err(EngineError::InvalidWeights(_))
        ));
    }
}
