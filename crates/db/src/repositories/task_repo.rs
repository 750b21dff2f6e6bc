//! Repository for the `tasks` table.
//!
//! Translates the validated query descriptor into one parameterized data
//! query plus one count query sharing the same predicate set, and maps raw
//! rows into domain records enriched with the pending-applications count.

use sqlx::PgPool;
use uuid::Uuid;

use maistor_core::categories::category_label;
use maistor_core::query::{SortBy, TaskQuery};
use maistor_core::search::{build_tsquery, clamp_limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use maistor_core::slug::{base_slug, numbered};
use maistor_core::task::Identifier;

use crate::models::task::{
    NewTask, Task, TaskChanges, TaskSearchRow, TaskWithMeta, TranslatedContent,
};

/// Column list for `tasks` queries without a table alias.
const TASK_COLUMNS: &str = "\
    id, slug, title, description, requirements, location_notes, \
    title_bg, description_bg, requirements_bg, location_notes_bg, \
    source_language, category, subcategory, city, neighborhood, \
    budget_min, budget_max, budget_type, deadline, is_urgent, status, \
    customer_id, selected_professional_id, images, content_version, \
    created_at, updated_at";

/// Column list for `tasks t` queries (alias-qualified, join-safe).
const T_COLUMNS: &str = "\
    t.id, t.slug, t.title, t.description, t.requirements, t.location_notes, \
    t.title_bg, t.description_bg, t.requirements_bg, t.location_notes_bg, \
    t.source_language, t.category, t.subcategory, t.city, t.neighborhood, \
    t.budget_min, t.budget_max, t.budget_type, t.deadline, t.is_urgent, t.status, \
    t.customer_id, t.selected_professional_id, t.images, t.content_version, \
    t.created_at, t.updated_at";

/// Badge count: only applications still pending count.
const PENDING_COUNT: &str = "\
    (SELECT COUNT(*) FROM task_applications a \
      WHERE a.task_id = t.id AND a.status = 'pending') AS pending_applications_count";

/// Provides query building and CRUD for tasks.
pub struct TaskRepo;

impl TaskRepo {
    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Execute the list query described by `query`.
    ///
    /// Returns the page slice plus the total number of rows matching the
    /// same predicates (unaffected by limit/offset).
    pub async fn search(
        pool: &PgPool,
        query: &TaskQuery,
    ) -> Result<(Vec<TaskWithMeta>, i64), sqlx::Error> {
        let f = &query.filters;

        // Pre-render the status list once; it is bound for both queries.
        let statuses: Option<Vec<String>> = f
            .statuses
            .as_ref()
            .map(|s| s.iter().map(|v| v.as_str().to_string()).collect());

        // Build dynamic WHERE clauses with numbered binds.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if f.customer_id.is_some() {
            conditions.push(format!("t.customer_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.applicant_id.is_some() {
            conditions.push(format!("ap.professional_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if statuses.is_some() {
            conditions.push(format!("t.status = ANY(${bind_idx})"));
            bind_idx += 1;
        }
        if f.category.is_some() {
            conditions.push(format!("t.category = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.subcategory.is_some() {
            conditions.push(format!("t.subcategory = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.city.is_some() {
            conditions.push(format!("t.city = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.neighborhood.is_some() {
            conditions.push(format!("t.neighborhood = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.is_urgent.is_some() {
            conditions.push(format!("t.is_urgent = ${bind_idx}"));
            bind_idx += 1;
        }
        if f.budget_min.is_some() {
            conditions.push(format!("t.budget_min >= ${bind_idx}"));
            bind_idx += 1;
        }
        if f.budget_max.is_some() {
            conditions.push(format!("t.budget_max <= ${bind_idx}"));
            bind_idx += 1;
        }

        // The applications preset routes through the applicant join.
        let from_clause = if f.applicant_id.is_some() {
            "tasks t JOIN task_applications ap ON ap.task_id = t.id"
        } else {
            "tasks t"
        };

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let data_sql = format!(
            "SELECT {T_COLUMNS}, {PENDING_COUNT} \
             FROM {from_clause} \
             {where_clause} \
             ORDER BY {order_clause} \
             LIMIT ${limit_idx} OFFSET ${offset_idx}",
            order_clause = order_by_sql(query.sort),
            limit_idx = bind_idx,
            offset_idx = bind_idx + 1,
        );
        let count_sql = format!("SELECT COUNT(*) FROM {from_clause} {where_clause}");

        let mut data_q = sqlx::query_as::<_, TaskWithMeta>(&data_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);

        // Bind dynamic parameters in the same order for both queries.
        if let Some(customer_id) = f.customer_id {
            data_q = data_q.bind(customer_id);
            count_q = count_q.bind(customer_id);
        }
        if let Some(applicant_id) = f.applicant_id {
            data_q = data_q.bind(applicant_id);
            count_q = count_q.bind(applicant_id);
        }
        if let Some(ref statuses) = statuses {
            data_q = data_q.bind(statuses);
            count_q = count_q.bind(statuses);
        }
        if let Some(ref category) = f.category {
            data_q = data_q.bind(category);
            count_q = count_q.bind(category);
        }
        if let Some(ref subcategory) = f.subcategory {
            data_q = data_q.bind(subcategory);
            count_q = count_q.bind(subcategory);
        }
        if let Some(ref city) = f.city {
            data_q = data_q.bind(city);
            count_q = count_q.bind(city);
        }
        if let Some(ref neighborhood) = f.neighborhood {
            data_q = data_q.bind(neighborhood);
            count_q = count_q.bind(neighborhood);
        }
        if let Some(is_urgent) = f.is_urgent {
            data_q = data_q.bind(is_urgent);
            count_q = count_q.bind(is_urgent);
        }
        if let Some(budget_min) = f.budget_min {
            data_q = data_q.bind(budget_min);
            count_q = count_q.bind(budget_min);
        }
        if let Some(budget_max) = f.budget_max {
            data_q = data_q.bind(budget_max);
            count_q = count_q.bind(budget_max);
        }

        let items = data_q
            .bind(query.limit)
            .bind(query.offset())
            .fetch_all(pool)
            .await?;
        let total = count_q.fetch_one(pool).await?;

        Ok((items, total))
    }

    // -----------------------------------------------------------------------
    // Detail
    // -----------------------------------------------------------------------

    /// Fetch a single task by id or slug, with the pending-count aggregate.
    ///
    /// Not-found is not exceptional here: it is `Ok(None)`, promoted to a
    /// typed error by the service layer.
    pub async fn find_by_identifier(
        pool: &PgPool,
        ident: &Identifier,
    ) -> Result<Option<TaskWithMeta>, sqlx::Error> {
        match ident {
            Identifier::ById(id) => {
                let sql = format!(
                    "SELECT {T_COLUMNS}, {PENDING_COUNT} FROM tasks t WHERE t.id = $1"
                );
                sqlx::query_as::<_, TaskWithMeta>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
            }
            Identifier::BySlug(slug) => {
                let sql = format!(
                    "SELECT {T_COLUMNS}, {PENDING_COUNT} FROM tasks t WHERE t.slug = $1"
                );
                sqlx::query_as::<_, TaskWithMeta>(&sql)
                    .bind(slug)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Fetch a plain task row by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Create (with slug generation)
    // -----------------------------------------------------------------------

    /// Insert a new task, deriving a unique slug from title + city + the
    /// category label in the task's source language.
    ///
    /// The existing-prefix check and the insert race: a concurrent create
    /// can claim the chosen slug between the check and the insert. A
    /// uniqueness violation on the slug constraint is retried exactly once
    /// with a freshly computed disambiguator; a second collision surfaces
    /// as an error.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<Task, sqlx::Error> {
        let label = category_label(&input.category, &input.source_language)
            .unwrap_or(input.category.as_str());
        let base = base_slug(&input.title, &input.city, label);

        let slug = Self::disambiguated_slug(pool, &base).await?;
        match Self::insert_row(pool, input, &slug).await {
            Ok(task) => Ok(task),
            Err(err) if is_slug_collision(&err) => {
                tracing::debug!(slug = %slug, "Slug claimed concurrently, retrying once");
                let slug = Self::disambiguated_slug(pool, &base).await?;
                Self::insert_row(pool, input, &slug).await
            }
            Err(err) => Err(err),
        }
    }

    /// Pick the next free slug for a base: the base itself if unclaimed,
    /// otherwise `base-N` where N counts existing slugs sharing the prefix.
    async fn disambiguated_slug(pool: &PgPool, base: &str) -> Result<String, sqlx::Error> {
        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_one(pool)
        .await?;

        Ok(if existing == 0 {
            base.to_string()
        } else {
            numbered(base, existing)
        })
    }

    async fn insert_row(pool: &PgPool, input: &NewTask, slug: &str) -> Result<Task, sqlx::Error> {
        let sql = format!(
            "INSERT INTO tasks (\
                slug, title, description, requirements, location_notes, \
                source_language, category, subcategory, city, neighborhood, \
                budget_min, budget_max, budget_type, deadline, is_urgent, \
                status, customer_id, images\
             ) VALUES (\
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                $11, $12, $13, $14, $15, $16, $17, $18\
             ) \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.requirements.as_deref())
            .bind(input.location_notes.as_deref())
            .bind(&input.source_language)
            .bind(&input.category)
            .bind(input.subcategory.as_deref())
            .bind(&input.city)
            .bind(input.neighborhood.as_deref())
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(&input.budget_type)
            .bind(input.deadline)
            .bind(input.is_urgent)
            .bind(&input.status)
            .bind(input.customer_id)
            .bind(&input.images)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    /// Apply a partial update. When `bump_content` is set the content
    /// version is incremented so in-flight translations of the previous
    /// text are discarded on arrival.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &TaskChanges,
        bump_content: bool,
    ) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                requirements = COALESCE($4, requirements), \
                location_notes = COALESCE($5, location_notes), \
                category = COALESCE($6, category), \
                subcategory = COALESCE($7, subcategory), \
                city = COALESCE($8, city), \
                neighborhood = COALESCE($9, neighborhood), \
                budget_min = COALESCE($10, budget_min), \
                budget_max = COALESCE($11, budget_max), \
                budget_type = COALESCE($12, budget_type), \
                deadline = COALESCE($13, deadline), \
                images = COALESCE($14, images), \
                content_version = content_version + CASE WHEN $15 THEN 1 ELSE 0 END \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.requirements.as_deref())
            .bind(input.location_notes.as_deref())
            .bind(input.category.as_deref())
            .bind(input.subcategory.as_deref())
            .bind(input.city.as_deref())
            .bind(input.neighborhood.as_deref())
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(input.budget_type.as_deref())
            .bind(input.deadline)
            .bind(input.images.as_ref())
            .bind(bump_content)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete: transition to `cancelled` instead of removing the row.
    /// Returns `true` if a row was cancelled.
    pub async fn cancel(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tasks SET status = 'cancelled' WHERE id = $1 AND status <> 'cancelled'")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Translations
    // -----------------------------------------------------------------------

    /// Persist translated content fields, but only if the task's content
    /// has not been edited since the translation was kicked off. Returns
    /// whether the translation was applied.
    pub async fn store_translations(
        pool: &PgPool,
        id: Uuid,
        content_version: i32,
        translated: &TranslatedContent,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET \
                title_bg = COALESCE($3, title_bg), \
                description_bg = COALESCE($4, description_bg), \
                requirements_bg = COALESCE($5, requirements_bg), \
                location_notes_bg = COALESCE($6, location_notes_bg) \
             WHERE id = $1 AND content_version = $2",
        )
        .bind(id)
        .bind(content_version)
        .bind(translated.title.as_deref())
        .bind(translated.description.as_deref())
        .bind(translated.requirements.as_deref())
        .bind(translated.location_notes.as_deref())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Full-text search
    // -----------------------------------------------------------------------

    /// Ranked full-text search, delegated to the `search_tasks` SQL
    /// function. Empty or unusable input yields an empty result.
    pub async fn search_fulltext(
        pool: &PgPool,
        query_text: &str,
        status: Option<&str>,
        city: Option<&str>,
        category: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<TaskSearchRow>, sqlx::Error> {
        let tsquery = match build_tsquery(query_text) {
            Some(q) => q,
            None => return Ok(Vec::new()),
        };
        let limit = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

        sqlx::query_as::<_, TaskSearchRow>(
            "SELECT * FROM search_tasks($1, $2, $3, $4, $5::INT)",
        )
        .bind(&tsquery)
        .bind(status)
        .bind(city)
        .bind(category)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

/// Resolve the ORDER BY clause for a sort key. The `urgent` sort carries a
/// documented secondary ordering on creation time.
fn order_by_sql(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Newest => "t.created_at DESC",
        SortBy::Oldest => "t.created_at ASC",
        SortBy::Deadline => "t.deadline ASC NULLS LAST",
        SortBy::BudgetHigh => "t.budget_max DESC NULLS LAST",
        SortBy::BudgetLow => "t.budget_min ASC NULLS LAST",
        SortBy::Urgent => "t.is_urgent DESC, t.created_at DESC",
    }
}

/// Whether an insert failed because the slug was claimed concurrently.
fn is_slug_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_tasks_slug")
        }
        _ => false,
    }
}
