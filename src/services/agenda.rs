//! Deterministic agenda suggestions from topic keywords.

/// Build an agenda outline for a meeting topic.
///
/// The structure depends only on the inputs: meetings longer than 15 minutes
/// get opening and closing items, the main block is split by topic keyword
/// (review, planning, brainstorm, or a generic discussion split), and groups
/// larger than five get a round-robin item near the top.
pub fn suggest_agenda(topic: &str, participant_count: usize, duration_minutes: i64) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    let has_bookends = duration_minutes > 15;
    if has_bookends {
        items.push("Opening & Introductions (5 min)".to_string());
    }

    let main_minutes = duration_minutes - if has_bookends { 10 } else { 0 };
    let topic_lower = topic.to_lowercase();

    if topic_lower.contains("review") {
        items.push(format!("Review Progress & Updates ({} min)", main_minutes / 2));
        items.push(format!("Discussion & Feedback ({} min)", main_minutes / 2));
    } else if topic_lower.contains("planning") {
        items.push(format!("Goal Setting & Planning ({} min)", main_minutes / 2));
        items.push(format!(
            "Timeline & Resource Allocation ({} min)",
            main_minutes / 2
        ));
    } else if topic_lower.contains("brainstorm") {
        items.push(format!("Idea Generation ({} min)", main_minutes * 2 / 3));
        items.push(format!(
            "Idea Evaluation & Selection ({} min)",
            main_minutes / 3
        ));
    } else {
        items.push(format!(
            "Topic Discussion: {} ({} min)",
            topic,
            main_minutes * 2 / 3
        ));
        items.push(format!(
            "Decision Making & Next Steps ({} min)",
            main_minutes / 3
        ));
    }

    if has_bookends {
        items.push("Action Items & Closing (5 min)".to_string());
    }

    if participant_count > 5 {
        let position = 1.min(items.len());
        items.insert(
            position,
            "Round-robin updates (limit 2 min per person)".to_string(),
        );
    }

    items
}
