//! Structured state reported by the course player, and its merge rules.
//!
//! A player update is partial: only the fields it carries change. The merge
//! is explicit and deterministic:
//!
//! - scalar fields (scores, statuses) are replaced when supplied;
//! - `bookmarks` are keyed by `lesson_id`: an incoming bookmark replaces the
//!   stored one for the same lesson, new lessons are appended;
//! - `interactions` are a log and are appended in arrival order;
//! - `raw_data` objects are merged key-wise (incoming keys win); any
//!   non-object value replaces the stored one outright.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Lower bound for a reported score.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound for a reported score.
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "incomplete")]
    Incomplete,
    #[serde(rename = "not attempted")]
    NotAttempted,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessStatus {
    Passed,
    Failed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub lesson_id: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub latency: Option<f64>,
}

/// Stored player state for one progress record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub completion_status: Option<CompletionStatus>,
    pub success_status: Option<SuccessStatus>,
    pub bookmarks: Vec<Bookmark>,
    pub interactions: Vec<Interaction>,
    pub raw_data: Option<serde_json::Value>,
}

/// Partial player-state update. Absent fields leave stored values alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStateUpdate {
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub completion_status: Option<CompletionStatus>,
    pub success_status: Option<SuccessStatus>,
    pub bookmarks: Option<Vec<Bookmark>>,
    pub interactions: Option<Vec<Interaction>>,
    pub raw_data: Option<serde_json::Value>,
}

impl PlayerStateUpdate {
    /// Reject out-of-range scores and bookmarks without a lesson id.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(score) = self.score {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(format!(
                    "score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
                ));
            }
        }
        if let Some(bookmarks) = &self.bookmarks {
            if bookmarks.iter().any(|b| b.lesson_id.trim().is_empty()) {
                return Err("bookmark lessonId must not be empty".to_string());
            }
        }
        Ok(())
    }
}

impl PlayerState {
    /// Apply a partial update in place.
    pub fn merge(&mut self, update: PlayerStateUpdate) {
        if update.score.is_some() {
            self.score = update.score;
        }
        if update.max_score.is_some() {
            self.max_score = update.max_score;
        }
        if update.min_score.is_some() {
            self.min_score = update.min_score;
        }
        if update.completion_status.is_some() {
            self.completion_status = update.completion_status;
        }
        if update.success_status.is_some() {
            self.success_status = update.success_status;
        }

        if let Some(bookmarks) = update.bookmarks {
            for incoming in bookmarks {
                match self
                    .bookmarks
                    .iter_mut()
                    .find(|b| b.lesson_id == incoming.lesson_id)
                {
                    Some(existing) => *existing = incoming,
                    None => self.bookmarks.push(incoming),
                }
            }
        }

        if let Some(interactions) = update.interactions {
            self.interactions.extend(interactions);
        }

        if let Some(raw) = update.raw_data {
            self.raw_data = Some(merge_raw(self.raw_data.take(), raw));
        }
    }
}

/// Shallow key-wise merge of two JSON objects; non-objects replace.
fn merge_raw(stored: Option<serde_json::Value>, incoming: serde_json::Value) -> serde_json::Value {
    match (stored, incoming) {
        (Some(serde_json::Value::Object(mut base)), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
            serde_json::Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bookmark(lesson: &str, ts: f64) -> Bookmark {
        Bookmark {
            lesson_id: lesson.to_string(),
            timestamp: Some(ts),
        }
    }

    fn interaction(id: &str) -> Interaction {
        Interaction {
            id: Some(id.to_string()),
            kind: Some("choice".to_string()),
            timestamp: None,
            result: Some("correct".to_string()),
            latency: None,
        }
    }

    #[test]
    fn scalars_are_replaced_only_when_supplied() {
        let mut state = PlayerState {
            score: Some(40.0),
            max_score: Some(100.0),
            completion_status: Some(CompletionStatus::Incomplete),
            ..Default::default()
        };

        state.merge(PlayerStateUpdate {
            score: Some(85.0),
            success_status: Some(SuccessStatus::Passed),
            ..Default::default()
        });

        assert_eq!(state.score, Some(85.0));
        assert_eq!(state.max_score, Some(100.0));
        assert_eq!(state.completion_status, Some(CompletionStatus::Incomplete));
        assert_eq!(state.success_status, Some(SuccessStatus::Passed));
    }

    #[test]
    fn bookmarks_merge_by_lesson() {
        let mut state = PlayerState {
            bookmarks: vec![bookmark("l1", 10.0), bookmark("l2", 20.0)],
            ..Default::default()
        };

        state.merge(PlayerStateUpdate {
            bookmarks: Some(vec![bookmark("l2", 99.0), bookmark("l3", 5.0)]),
            ..Default::default()
        });

        assert_eq!(
            state.bookmarks,
            vec![bookmark("l1", 10.0), bookmark("l2", 99.0), bookmark("l3", 5.0)]
        );
    }

    #[test]
    fn interactions_append() {
        let mut state = PlayerState {
            interactions: vec![interaction("q1")],
            ..Default::default()
        };

        state.merge(PlayerStateUpdate {
            interactions: Some(vec![interaction("q2"), interaction("q1")]),
            ..Default::default()
        });

        let ids: Vec<_> = state
            .interactions
            .iter()
            .map(|i| i.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, ["q1", "q2", "q1"]);
    }

    #[test]
    fn raw_data_objects_merge_key_wise() {
        let mut state = PlayerState {
            raw_data: Some(json!({"cmi.location": "p3", "cmi.suspend_data": "abc"})),
            ..Default::default()
        };

        state.merge(PlayerStateUpdate {
            raw_data: Some(json!({"cmi.location": "p4", "cmi.exit": "suspend"})),
            ..Default::default()
        });

        assert_eq!(
            state.raw_data,
            Some(json!({
                "cmi.location": "p4",
                "cmi.suspend_data": "abc",
                "cmi.exit": "suspend"
            }))
        );
    }

    #[test]
    fn non_object_raw_data_replaces() {
        let mut state = PlayerState {
            raw_data: Some(json!({"a": 1})),
            ..Default::default()
        };
        state.merge(PlayerStateUpdate {
            raw_data: Some(json!("opaque")),
            ..Default::default()
        });
        assert_eq!(state.raw_data, Some(json!("opaque")));
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let original = PlayerState {
            score: Some(1.0),
            bookmarks: vec![bookmark("l1", 1.0)],
            interactions: vec![interaction("q1")],
            raw_data: Some(json!({"k": "v"})),
            ..Default::default()
        };
        let mut state = original.clone();
        state.merge(PlayerStateUpdate::default());
        assert_eq!(state, original);
    }

    #[test]
    fn deserializes_player_wire_format() {
        let update: PlayerStateUpdate = serde_json::from_value(json!({
            "score": 72,
            "completionStatus": "not attempted",
            "successStatus": "failed",
            "bookmarks": [{"lessonId": "intro", "timestamp": 12.5}],
            "interactions": [{"id": "q1", "type": "true-false", "result": "wrong"}]
        }))
        .unwrap();

        assert_eq!(update.score, Some(72.0));
        assert_eq!(update.completion_status, Some(CompletionStatus::NotAttempted));
        assert_eq!(update.success_status, Some(SuccessStatus::Failed));
        assert_eq!(update.bookmarks.unwrap()[0].lesson_id, "intro");
        assert_eq!(update.interactions.unwrap()[0].kind.as_deref(), Some("true-false"));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let update = PlayerStateUpdate {
            score: Some(101.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = PlayerStateUpdate {
            score: Some(100.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn blank_bookmark_lesson_is_rejected() {
        let update = PlayerStateUpdate {
            bookmarks: Some(vec![bookmark(" ", 1.0)]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
