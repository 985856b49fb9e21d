//! Progress entity model.

use lms_core::player_state::PlayerState;
use lms_core::progress::{Certificate, ProgressFields};
use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::types::Json;

/// Full progress row from the `progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub progress: f64,
    pub completed: bool,
    /// Minutes spent in the player, accumulated across updates.
    pub time_spent: f64,
    pub last_accessed_at: Timestamp,
    #[serde(rename = "scormData")]
    pub player_state: Json<PlayerState>,
    pub certificate: Option<Json<Certificate>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Progress {
    /// The fields a player update may change.
    pub fn fields(&self) -> ProgressFields {
        ProgressFields {
            progress: self.progress,
            completed: self.completed,
            time_spent: self.time_spent,
            player_state: self.player_state.0.clone(),
        }
    }
}
