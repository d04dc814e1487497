// ============================================================================
// JSON Boundary Parsing
// ============================================================================
//
// The engine consumes plain records; this is the single place where untyped
// JSON snapshots from the calling layer become validated, typed records.
// Validation happens here once, never inside the scoring math.

use crate::api::{AvailabilityWindow, Meeting, User};
use crate::models::time::resolve_zone;
use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct RosterInput {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    meetings: Vec<Meeting>,
    #[serde(default)]
    availability_windows: Vec<AvailabilityWindow>,
}

/// A validated snapshot of users, meetings, and availability windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub users: Vec<User>,
    pub meetings: Vec<Meeting>,
    pub availability_windows: Vec<AvailabilityWindow>,
}

fn validate_input_roster(roster_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(roster_json).context("Invalid roster JSON")?;
    let has_users = value.as_object().and_then(|obj| obj.get("users")).is_some();
    if !has_users {
        bail!("Missing required 'users' field");
    }
    Ok(())
}

/// Parse a roster snapshot from a JSON string.
///
/// Deserializes the snapshot with Serde and enforces the record invariants:
/// resolvable time zones, ordered work hours, ISO work days, positive meeting
/// durations, non-empty participant sets, and ordered window intervals.
///
/// # Arguments
///
/// * `roster_json` - Roster JSON with `users`, `meetings`, and
///   `availability_windows` arrays (snake_case field names)
///
/// # Returns
///
/// A fully validated `Roster` ready to hand to the engine services.
pub fn parse_roster_json_str(roster_json: &str) -> Result<Roster> {
    validate_input_roster(roster_json)?;

    let input: RosterInput = serde_json::from_str(roster_json)
        .context("Failed to deserialize roster JSON using Serde")?;

    for user in &input.users {
        resolve_zone(&user.timezone)
            .with_context(|| format!("User {} has an unrecognized time zone", user.id))?;
        if user.work_start_hour >= user.work_end_hour || user.work_end_hour > 24 {
            bail!(
                "User {} has invalid work hours {}-{}",
                user.id,
                user.work_start_hour,
                user.work_end_hour
            );
        }
        if user.work_days.is_empty() || user.work_days.iter().any(|d| !(1..=7).contains(d)) {
            bail!("User {} has invalid work days {:?}", user.id, user.work_days);
        }
    }

    for meeting in &input.meetings {
        if meeting.duration_minutes <= 0 {
            bail!(
                "Meeting {} has non-positive duration {}",
                meeting.id,
                meeting.duration_minutes
            );
        }
        if meeting.participants.is_empty() {
            bail!("Meeting {} has no participants", meeting.id);
        }
        if let Some(score) = meeting.effectiveness_score {
            if !(0.0..=10.0).contains(&score) {
                bail!(
                    "Meeting {} has out-of-range effectiveness score {}",
                    meeting.id,
                    score
                );
            }
        }
    }

    for window in &input.availability_windows {
        if window.interval.end <= window.interval.start {
            bail!(
                "Availability window for user {} has end before start",
                window.user_id
            );
        }
    }

    debug!(
        "parsed roster: {} users, {} meetings, {} availability windows",
        input.users.len(),
        input.meetings.len(),
        input.availability_windows.len()
    );

    Ok(Roster {
        users: input.users,
        meetings: input.meetings,
        availability_windows: input.availability_windows,
    })
}

// ============================================================================
// Tests
// ============================================================================
