//! Task models and DTOs.

use maistor_core::privacy::PrivacyFiltered;
use maistor_core::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    pub title_bg: Option<String>,
    pub description_bg: Option<String>,
    pub requirements_bg: Option<String>,
    pub location_notes_bg: Option<String>,
    pub source_language: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: String,
    pub deadline: Option<Timestamp>,
    pub is_urgent: bool,
    pub status: String,
    pub customer_id: Uuid,
    pub selected_professional_id: Option<Uuid>,
    pub images: Vec<String>,
    pub content_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task enriched with the pending-applications badge count.
///
/// The count covers applications with status exactly `pending`; rejected,
/// withdrawn, and accepted applications do not count toward the badge.
/// It is recomputed per query, never cached on the row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithMeta {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    pub title_bg: Option<String>,
    pub description_bg: Option<String>,
    pub requirements_bg: Option<String>,
    pub location_notes_bg: Option<String>,
    pub source_language: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: String,
    pub deadline: Option<Timestamp>,
    pub is_urgent: bool,
    pub status: String,
    pub customer_id: Uuid,
    pub selected_professional_id: Option<Uuid>,
    pub images: Vec<String>,
    pub content_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub pending_applications_count: i64,
}

impl PrivacyFiltered for TaskWithMeta {
    fn owner_id(&self) -> Uuid {
        self.customer_id
    }
}

/// A ranked row returned by the `search_tasks` SQL function.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSearchRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: String,
    pub deadline: Option<Timestamp>,
    pub is_urgent: bool,
    pub status: String,
    pub customer_id: Uuid,
    pub created_at: Timestamp,
    /// Relevance rank from `ts_rank`.
    pub rank: f32,
}

// ---------------------------------------------------------------------------
// Storage shapes
// ---------------------------------------------------------------------------

/// Insert shape for a new task. All derived fields (slug, urgency) are
/// computed by the repository/service before insert.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    pub source_language: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: String,
    pub deadline: Option<Timestamp>,
    pub is_urgent: bool,
    pub status: String,
    pub customer_id: Uuid,
    pub images: Vec<String>,
}

/// Partial-update shape; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: Option<String>,
    pub deadline: Option<Timestamp>,
    pub images: Option<Vec<String>>,
}

/// Translated content fields; any subset may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatedContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for posting a new task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    /// Language the listing was written in; defaults to the pivot language.
    #[serde(default = "default_language")]
    pub source_language: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: Option<String>,
    pub deadline: Option<Timestamp>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_language() -> String {
    maistor_core::task::PIVOT_LANGUAGE.to_string()
}

/// DTO for editing an existing task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_type: Option<String>,
    pub deadline: Option<Timestamp>,
    pub images: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    /// Whether this edit touches any translatable content field.
    pub fn changes_content(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.requirements.is_some()
            || self.location_notes.is_some()
    }
}
