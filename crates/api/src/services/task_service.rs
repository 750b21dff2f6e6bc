//! Orchestration of the task use cases: parse, query, privacy-filter, and
//! the create/update flows with validation and fire-and-forget translation.

use serde::Serialize;
use uuid::Uuid;

use maistor_core::error::CoreError;
use maistor_core::pagination::Paginated;
use maistor_core::privacy::{is_owner, PrivacyFiltered};
use maistor_core::query::{TaskListParams, TaskQuery};
use maistor_core::task::{is_urgent_deadline, BudgetType, Identifier, TaskStatus, PIVOT_LANGUAGE};
use maistor_core::validation::{
    validate_budget, validate_description, validate_images, validate_title,
};

use maistor_db::models::customer::CustomerProfile;
use maistor_db::models::task::{
    CreateTaskRequest, NewTask, Task, TaskChanges, TaskWithMeta, UpdateTaskRequest,
};
use maistor_db::repositories::{CustomerRepo, TaskRepo};

use crate::background::translation::TranslationJob;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Detail response: the task plus derived metadata for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub task: TaskWithMeta,
    /// Public profile of the owning customer; a missing customer record
    /// degrades to `null` rather than failing the fetch.
    pub customer: Option<CustomerProfile>,
    pub related_data: RelatedData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedData {
    pub applications_count: i64,
    pub is_owner: bool,
}

pub struct TaskService;

impl TaskService {
    // -----------------------------------------------------------------------
    // Read paths
    // -----------------------------------------------------------------------

    /// List tasks: parse raw params, inject the viewer identity, query, and
    /// privacy-filter every record before it leaves the service.
    pub async fn list_tasks(
        state: &AppState,
        params: &TaskListParams,
        viewer: Option<Uuid>,
    ) -> AppResult<Paginated<TaskWithMeta>> {
        let query = TaskQuery::from_params(params, viewer)?;
        let (items, total) = TaskRepo::search(&state.pool, &query).await?;

        let items = items
            .into_iter()
            .map(|task| task.apply_privacy(viewer))
            .collect();

        Ok(Paginated::new(items, query.page, query.limit, total))
    }

    /// Fetch one task by id or slug. The repository's `None` is promoted to
    /// a typed not-found error here.
    pub async fn get_task_detail(
        state: &AppState,
        id_or_slug: &str,
        viewer: Option<Uuid>,
    ) -> AppResult<TaskDetail> {
        let ident = Identifier::parse(id_or_slug);
        let task = TaskRepo::find_by_identifier(&state.pool, &ident)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Task",
                key: id_or_slug.to_string(),
            })?;

        let task = task.apply_privacy(viewer);
        let customer = CustomerRepo::find_public_profile(&state.pool, task.customer_id).await?;

        let related_data = RelatedData {
            applications_count: task.pending_applications_count,
            is_owner: is_owner(task.customer_id, viewer),
        };

        Ok(TaskDetail {
            task,
            customer,
            related_data,
        })
    }

    // -----------------------------------------------------------------------
    // Write paths
    // -----------------------------------------------------------------------

    /// Create a task and kick off a background translation when the listing
    /// was not written in the pivot language. The response never waits for
    /// (or learns about) the translation.
    pub async fn create_task(
        state: &AppState,
        input: CreateTaskRequest,
        user_id: Uuid,
    ) -> AppResult<Task> {
        ensure_may_post(user_id)?;

        let budget_type = parse_budget_type(input.budget_type.as_deref())?;

        validate_title(&input.title)?;
        validate_description(&input.description)?;
        validate_budget(budget_type, input.budget_min, input.budget_max)?;
        validate_images(&input.images)?;

        let now = chrono::Utc::now();
        let is_urgent = input
            .deadline
            .map(|deadline| is_urgent_deadline(&deadline, &now))
            .unwrap_or(false);

        let new_task = NewTask {
            title: input.title,
            description: input.description,
            requirements: input.requirements,
            location_notes: input.location_notes,
            source_language: input.source_language,
            category: input.category,
            subcategory: input.subcategory,
            city: input.city,
            neighborhood: input.neighborhood,
            budget_min: input.budget_min,
            budget_max: input.budget_max,
            budget_type: budget_type.as_str().to_string(),
            deadline: input.deadline,
            is_urgent,
            status: TaskStatus::Open.as_str().to_string(),
            customer_id: user_id,
            images: input.images,
        };

        let task = TaskRepo::create(&state.pool, &new_task).await?;
        tracing::info!(task_id = %task.id, customer_id = %user_id, slug = %task.slug, "Task created");

        if task.source_language != PIVOT_LANGUAGE {
            state.translations.enqueue(TranslationJob::for_task(&task));
        }

        Ok(task)
    }

    /// Update a task. Only the owning customer may mutate it; edits to
    /// content fields bump the content version and re-trigger translation
    /// with the new values (stored values fill the gaps).
    pub async fn update_task(
        state: &AppState,
        id: Uuid,
        input: UpdateTaskRequest,
        user_id: Uuid,
    ) -> AppResult<Task> {
        if let Some(ref title) = input.title {
            validate_title(title)?;
        }
        if let Some(ref description) = input.description {
            validate_description(description)?;
        }
        if let Some(ref images) = input.images {
            validate_images(images)?;
        }

        let existing = TaskRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Task",
                key: id.to_string(),
            })?;

        if existing.customer_id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "only the task owner can modify it".into(),
            )));
        }

        // Validate the budget as it will be after the update.
        let budget_type = match input.budget_type.as_deref() {
            Some(raw) => parse_budget_type(Some(raw))?,
            None => BudgetType::parse(&existing.budget_type).unwrap_or(BudgetType::Unclear),
        };
        let budget_min = input.budget_min.or(existing.budget_min);
        let budget_max = input.budget_max.or(existing.budget_max);
        validate_budget(budget_type, budget_min, budget_max)?;

        let content_changed = input.changes_content();
        let changes = TaskChanges {
            title: input.title,
            description: input.description,
            requirements: input.requirements,
            location_notes: input.location_notes,
            category: input.category,
            subcategory: input.subcategory,
            city: input.city,
            neighborhood: input.neighborhood,
            budget_min: input.budget_min,
            budget_max: input.budget_max,
            budget_type: input.budget_type,
            deadline: input.deadline,
            images: input.images,
        };

        let updated = TaskRepo::update(&state.pool, id, &changes, content_changed)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Task",
                key: id.to_string(),
            })?;
        tracing::info!(task_id = %id, customer_id = %user_id, "Task updated");

        if content_changed && updated.source_language != PIVOT_LANGUAGE {
            state
                .translations
                .enqueue(TranslationJob::for_task(&updated));
        }

        Ok(updated)
    }

    /// Delete-as-cancel: tasks are never physically removed by this layer.
    pub async fn delete_task(state: &AppState, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let existing = TaskRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Task",
                key: id.to_string(),
            })?;

        if existing.customer_id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "only the task owner can cancel it".into(),
            )));
        }

        TaskRepo::cancel(&state.pool, id).await?;
        tracing::info!(task_id = %id, customer_id = %user_id, "Task cancelled");
        Ok(())
    }
}

/// Posting-policy gate. Every customer may currently post; rate limits or
/// account standing checks slot in here without touching the call sites.
fn ensure_may_post(_user_id: Uuid) -> Result<(), CoreError> {
    Ok(())
}

fn parse_budget_type(raw: Option<&str>) -> Result<BudgetType, CoreError> {
    match raw {
        None => Ok(BudgetType::Unclear),
        Some(raw) => BudgetType::parse(raw)
            .ok_or_else(|| CoreError::Validation(format!("unknown budgetType '{raw}'"))),
    }
}
