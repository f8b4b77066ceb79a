//! Study event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Something that changed a learner's study state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudyEvent {
    /// A word was presented to a learner for the first time.
    ProgressStarted {
        learner_id: String,
        word_id: String,
        timestamp: DateTime<Utc>,
    },
    /// An answer was stored.
    AnswerRecorded {
        learner_id: String,
        word_id: String,
        correct: bool,
        mastery_level: i64,
        next_review: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    },
    /// Any cached study queue for the learner is stale.
    QueueInvalidated {
        learner_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl StudyEvent {
    /// Learner the event concerns.
    pub fn learner_id(&self) -> &str {
        match self {
            StudyEvent::ProgressStarted { learner_id, .. }
            | StudyEvent::AnswerRecorded { learner_id, .. }
            | StudyEvent::QueueInvalidated { learner_id, .. } => learner_id,
        }
    }

    /// Event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            StudyEvent::ProgressStarted { .. } => "progress_started",
            StudyEvent::AnswerRecorded { .. } => "answer_recorded",
            StudyEvent::QueueInvalidated { .. } => "queue_invalidated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_tag() {
        let event = StudyEvent::QueueInvalidated {
            learner_id: "u1".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "queue_invalidated");
        assert_eq!(event.learner_id(), "u1");
    }
}
