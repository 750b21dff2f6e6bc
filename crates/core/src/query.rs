//! Parsing of untrusted list-endpoint query parameters into a validated,
//! typed filter/sort/pagination descriptor.
//!
//! Everything arrives stringly-typed (or missing); nothing passes this
//! boundary untyped. Parsing is deterministic and side-effect free.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::task::TaskStatus;

/// Default page size for task listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for task listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw query parameters as they come off the wire.
///
/// Every field is optional and textual; numeric fields are parsed (not
/// deserialized) so that non-numeric garbage degrades to defaults instead
/// of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Single value or comma-separated list of statuses.
    pub status: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub is_urgent: Option<String>,
    pub budget_min: Option<String>,
    pub budget_max: Option<String>,
    pub sort_by: Option<String>,
    pub mode: Option<String>,
}

/// Named filter presets applied on top of user-supplied filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Public browsing: status is forced to exactly `[open]`.
    Browse,
    /// Tasks posted by the requesting customer.
    Posted,
    /// Tasks the requesting professional has applied to.
    Applications,
}

impl QueryMode {
    pub fn parse(s: &str) -> Option<QueryMode> {
        match s {
            "browse" => Some(QueryMode::Browse),
            "posted" => Some(QueryMode::Posted),
            "applications" => Some(QueryMode::Applications),
            _ => None,
        }
    }
}

/// Sort order for task listings. Unknown values default to [`SortBy::Newest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    /// Soonest deadline first; tasks without a deadline sort last.
    Deadline,
    /// Highest `budget_max` first; tasks without a budget sort last.
    BudgetHigh,
    /// Lowest `budget_min` first; tasks without a budget sort last.
    BudgetLow,
    /// Urgent tasks first, newest-first within each group.
    Urgent,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<SortBy> {
        match s {
            "newest" => Some(SortBy::Newest),
            "oldest" => Some(SortBy::Oldest),
            "deadline" => Some(SortBy::Deadline),
            "budget_high" => Some(SortBy::BudgetHigh),
            "budget_low" => Some(SortBy::BudgetLow),
            "urgent" => Some(SortBy::Urgent),
            _ => None,
        }
    }
}

/// Validated filter set for the task listing query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    /// Owner filter (`posted` mode).
    pub customer_id: Option<Uuid>,
    /// Applicant filter (`applications` mode).
    pub applicant_id: Option<Uuid>,
    /// `None` means "any status" -- deliberately permissive: an entirely
    /// invalid status list degrades to no filter, not to match-nothing.
    pub statuses: Option<Vec<TaskStatus>>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub is_urgent: Option<bool>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
}

/// The validated query descriptor handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskQuery {
    pub filters: TaskFilters,
    pub sort: SortBy,
    pub mode: Option<QueryMode>,
    /// 1-based page number, always >= 1.
    pub page: i64,
    /// Page size, always within [1, 100].
    pub limit: i64,
}

impl TaskQuery {
    /// Row offset of the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Parse and validate raw parameters into a descriptor.
    ///
    /// `viewer` is the authenticated caller (if any); it is injected into
    /// the filter set by the `posted`/`applications` presets and never taken
    /// from end-user input directly.
    pub fn from_params(
        params: &TaskListParams,
        viewer: Option<Uuid>,
    ) -> Result<TaskQuery, CoreError> {
        let page = parse_int(params.page.as_deref(), 1).max(1);
        let limit = parse_int(params.limit.as_deref(), DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let budget_min = parse_decimal(params.budget_min.as_deref());
        let budget_max = parse_decimal(params.budget_max.as_deref());
        if let (Some(min), Some(max)) = (budget_min, budget_max) {
            if min > max {
                return Err(CoreError::Validation(
                    "budgetMin cannot exceed budgetMax".into(),
                ));
            }
        }

        let mode = match params.mode.as_deref() {
            None => None,
            Some(raw) => Some(QueryMode::parse(raw).ok_or_else(|| {
                CoreError::Validation(format!("unknown mode '{raw}'"))
            })?),
        };

        let mut filters = TaskFilters {
            customer_id: None,
            applicant_id: None,
            statuses: parse_status_filter(params.status.as_deref()),
            category: non_empty(params.category.as_deref()),
            subcategory: non_empty(params.subcategory.as_deref()),
            city: non_empty(params.city.as_deref()),
            neighborhood: non_empty(params.neighborhood.as_deref()),
            is_urgent: parse_bool(params.is_urgent.as_deref()),
            budget_min,
            budget_max,
        };

        // Presets win over user-supplied filters.
        match mode {
            Some(QueryMode::Browse) => {
                filters.statuses = Some(vec![TaskStatus::Open]);
            }
            Some(QueryMode::Posted) => {
                filters.customer_id = Some(require_viewer(viewer, "posted")?);
            }
            Some(QueryMode::Applications) => {
                filters.applicant_id = Some(require_viewer(viewer, "applications")?);
            }
            None => {}
        }

        let sort = params
            .sort_by
            .as_deref()
            .and_then(SortBy::parse)
            .unwrap_or_default();

        Ok(TaskQuery {
            filters,
            sort,
            mode,
            page,
            limit,
        })
    }
}

fn require_viewer(viewer: Option<Uuid>, mode: &str) -> Result<Uuid, CoreError> {
    viewer.ok_or_else(|| {
        CoreError::Unauthorized(format!("mode '{mode}' requires authentication"))
    })
}

/// Parse an integer parameter; missing or non-numeric input yields the
/// default (before the caller's clamp is applied).
fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(default)
}

/// Parse a decimal parameter; unparseable input means the filter is unset.
fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
}

/// Parse a boolean-like parameter (`true`/`false`/`1`/`0`, case-insensitive);
/// anything else means the filter is unset.
fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => Some(true),
        Some("false") | Some("0") => Some(false),
        _ => None,
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a single value or comma-separated status list. Unknown entries are
/// silently dropped; if nothing survives, the filter is treated as absent
/// (matches any status) rather than as match-nothing.
fn parse_status_filter(raw: Option<&str>) -> Option<Vec<TaskStatus>> {
    let raw = raw?;
    let statuses: Vec<TaskStatus> = raw
        .split(',')
        .map(str::trim)
        .filter_map(TaskStatus::parse)
        .collect();

    if statuses.is_empty() {
        None
    } else {
        Some(statuses)
    }
}
