//! Task application models.
//!
//! The application lifecycle (accept/reject/withdraw) lives in the
//! professional workflows; this layer only creates applications and
//! aggregates the pending count for the owner's badge.

use maistor_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `task_applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub task_id: Uuid,
    pub professional_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
