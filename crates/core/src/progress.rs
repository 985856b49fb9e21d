//! Progress update rules.
//!
//! Per-field semantics for a partial update:
//!
//! | Field          | Rule                                  |
//! |----------------|---------------------------------------|
//! | `progress`     | overwritten when supplied             |
//! | `time_spent`   | added to the stored total (minutes)   |
//! | `completed`    | overwritten when supplied             |
//! | `player_state` | merged via [`PlayerState::merge`]     |
//!
//! A first completion is the only update that changes the owning
//! enrollment; see [`AppliedUpdate::first_completion`].

use serde::{Deserialize, Serialize};

use crate::player_state::{PlayerState, PlayerStateUpdate};
use crate::types::Timestamp;

pub const MIN_PERCENT: f64 = 0.0;
pub const MAX_PERCENT: f64 = 100.0;

/// Completion certificate attached to a progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub issued_at: Option<Timestamp>,
    pub certificate_id: Option<String>,
    pub certificate_url: Option<String>,
}

/// Partial progress update as reported by the course player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressUpdate {
    pub progress: Option<f64>,
    pub completed: Option<bool>,
    pub time_spent: Option<f64>,
    #[serde(alias = "scormData")]
    pub player_state: Option<PlayerStateUpdate>,
}

impl ProgressUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(p) = self.progress {
            if !(MIN_PERCENT..=MAX_PERCENT).contains(&p) {
                return Err(format!(
                    "progress must be between {MIN_PERCENT} and {MAX_PERCENT}, got {p}"
                ));
            }
        }
        if let Some(t) = self.time_spent {
            if !t.is_finite() || t < 0.0 {
                return Err(format!("timeSpent must not be negative, got {t}"));
            }
        }
        if let Some(state) = &self.player_state {
            state.validate()?;
        }
        Ok(())
    }
}

/// The mutable fields of a stored progress record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressFields {
    pub progress: f64,
    pub completed: bool,
    pub time_spent: f64,
    pub player_state: PlayerState,
}

/// Result of applying an update to stored fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedUpdate {
    pub fields: ProgressFields,
    /// `true` when this update moved `completed` from `false` to `true`.
    pub first_completion: bool,
}

/// Apply `update` to `current`. The update must already be validated.
pub fn apply_update(current: ProgressFields, update: ProgressUpdate) -> AppliedUpdate {
    let was_completed = current.completed;
    let mut fields = current;

    if let Some(p) = update.progress {
        fields.progress = p;
    }
    if let Some(c) = update.completed {
        fields.completed = c;
    }
    if let Some(t) = update.time_spent {
        fields.time_spent += t;
    }
    if let Some(state) = update.player_state {
        fields.player_state.merge(state);
    }

    AppliedUpdate {
        first_completion: !was_completed && fields.completed,
        fields,
    }
}
