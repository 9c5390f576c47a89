//! Keyword-based fallback summarization.
//!
//! Used when the language model is unreachable or returns something that
//! is not the requested JSON. Output is skeletal but never empty: even a
//! transcript with no keyword hits produces generic placeholder entries.

use super::MeetingSummary;

const KEY_POINT_KEYWORDS: &[&str] = &[
    "discussed", "review", "update", "progress", "issue", "problem", "solution", "decision",
    "agreed", "plan", "schedule", "deadline", "budget", "resource",
];

const ACTION_KEYWORDS: &[&str] = &[
    "will",
    "should",
    "need to",
    "action",
    "task",
    "assign",
    "follow up",
    "next week",
    "by friday",
    "deadline",
    "complete",
    "deliver",
];

const DECISION_KEYWORDS: &[&str] = &[
    "decided", "agreed", "approved", "rejected", "chosen", "selected", "final", "conclude",
    "resolve",
];

const PLACEHOLDER_KEY_POINTS: &[&str] = &[
    "Main discussion topics covered",
    "Key decisions made during meeting",
    "Important updates shared",
    "Next steps identified",
];

const PLACEHOLDER_ACTIONS: &[&str] = &[
    "Follow up on discussed items",
    "Schedule next meeting",
    "Share meeting notes with team",
];

fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > 10)
        .collect()
}

/// Sentences containing any of the keywords, deduplicated, first match
/// order preserved.
fn matching_sentences(text: &str, keywords: &[&str]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();

    for sentence in sentences(text) {
        let lower = sentence.to_lowercase();
        if keywords.iter().any(|k| lower.contains(k)) && !matched.iter().any(|m| m == sentence) {
            matched.push(sentence.to_string());
        }
    }

    matched
}

fn capped(mut items: Vec<String>, cap: usize, placeholders: &[&str]) -> Vec<String> {
    if items.is_empty() {
        return placeholders.iter().map(|s| s.to_string()).collect();
    }
    items.truncate(cap);
    items
}

/// Extract a skeletal summary directly from the transcript.
pub fn extract(transcript: &str, title: &str, participants: &[String]) -> MeetingSummary {
    let key_points = matching_sentences(transcript, KEY_POINT_KEYWORDS);
    let action_items = matching_sentences(transcript, ACTION_KEYWORDS);
    let decisions = matching_sentences(transcript, DECISION_KEYWORDS);

    let summary = match sentences(transcript).first() {
        Some(first) => format!(
            "Meeting \"{}\" covered key topics and discussions. {}. Various action items and next steps were identified.",
            title, first
        ),
        None => format!(
            "Meeting \"{}\" was held with {} participants. Key discussions and decisions were made.",
            title,
            participants.len()
        ),
    };

    let next_steps = capped(action_items.clone(), 3, PLACEHOLDER_ACTIONS);

    MeetingSummary {
        summary,
        key_points: capped(key_points, 5, PLACEHOLDER_KEY_POINTS),
        action_items: capped(action_items, 4, PLACEHOLDER_ACTIONS),
        decisions: capped(decisions, 3, &["No explicit decisions recorded"]),
        next_steps,
        participants: participants.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_sentences_extracted() {
        let transcript = "We reviewed the login flow and found an issue. \
            Sam will deliver the fix by Friday. \
            We agreed to postpone the mobile release. \
            The weather was nice.";

        let summary = extract(transcript, "Standup", &["Sam".to_string()]);

        assert!(summary
            .key_points
            .iter()
            .any(|p| p.contains("reviewed the login flow")));
        assert!(summary
            .action_items
            .iter()
            .any(|a| a.contains("deliver the fix")));
        assert!(summary
            .decisions
            .iter()
            .any(|d| d.contains("agreed to postpone")));
    }

    #[test]
    fn test_empty_transcript_yields_placeholders() {
        let summary = extract("", "Kickoff", &[]);

        assert!(!summary.summary.is_empty());
        assert!(!summary.key_points.is_empty());
        assert!(!summary.action_items.is_empty());
        assert!(!summary.decisions.is_empty());
        assert!(!summary.next_steps.is_empty());
    }

    #[test]
    fn test_no_keyword_transcript_yields_placeholders() {
        let summary = extract("La la la la la la. Doo doo doo doo doo.", "Jam", &[]);

        assert_eq!(
            summary.key_points,
            PLACEHOLDER_KEY_POINTS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicate_sentences_deduplicated() {
        let transcript = "We agreed to ship it. We agreed to ship it. We agreed to ship it.";
        let summary = extract(transcript, "Ship", &[]);

        assert_eq!(
            summary
                .decisions
                .iter()
                .filter(|d| d.contains("agreed to ship"))
                .count(),
            1
        );
    }

    #[test]
    fn test_caps_enforced() {
        let transcript = (0..20)
            .map(|i| format!("We discussed topic number {} in depth today.", i))
            .collect::<Vec<_>>()
            .join(" ");

        let summary = extract(&transcript, "Marathon", &[]);
        assert!(summary.key_points.len() <= 5);
        assert!(summary.action_items.len() <= 4);
        assert!(summary.decisions.len() <= 3);
        assert!(summary.next_steps.len() <= 3);
    }

    #[test]
    fn test_participants_passed_through() {
        let names = vec!["Sam".to_string(), "Priya".to_string()];
        let summary = extract("Something happened today.", "Sync", &names);
        assert_eq!(summary.participants, names);
    }
}
