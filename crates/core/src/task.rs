//! Task taxonomy: lifecycle statuses, budget types, and identifier dispatch.

use uuid::Uuid;

/// The language all listings are eventually translated into.
pub const PIVOT_LANGUAGE: &str = "bg";

/// Maximum number of images attached to a task.
pub const MAX_TASK_IMAGES: usize = 5;

/// Lifecycle status of a task.
///
/// A flat enum: transitions happen in the application/professional
/// workflows, not in this layer. The query pipeline only reads and
/// equality-filters on it, and writes [`TaskStatus::Cancelled`] for
/// delete-as-cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Draft,
    Open,
    InProgress,
    PendingCustomerConfirmation,
    Completed,
    Cancelled,
    Disputed,
}

impl TaskStatus {
    /// All valid statuses, in lifecycle order.
    pub const ALL: &'static [TaskStatus] = &[
        TaskStatus::Draft,
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::PendingCustomerConfirmation,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
        TaskStatus::Disputed,
    ];

    /// The stored (and wire) representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Draft => "draft",
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::PendingCustomerConfirmation => "pending_customer_confirmation",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Disputed => "disputed",
        }
    }

    /// Parse a stored/wire value. Returns `None` for anything outside the
    /// fixed enum -- callers decide whether that is an error or a silently
    /// dropped filter entry.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        TaskStatus::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// How a task's budget is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    Fixed,
    Hourly,
    Negotiable,
    Unclear,
}

impl BudgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Fixed => "fixed",
            BudgetType::Hourly => "hourly",
            BudgetType::Negotiable => "negotiable",
            BudgetType::Unclear => "unclear",
        }
    }

    pub fn parse(s: &str) -> Option<BudgetType> {
        match s {
            "fixed" => Some(BudgetType::Fixed),
            "hourly" => Some(BudgetType::Hourly),
            "negotiable" => Some(BudgetType::Negotiable),
            "unclear" => Some(BudgetType::Unclear),
            _ => None,
        }
    }

    /// Whether both budget bounds are meaningful for this type (and thus
    /// subject to the `max > min` invariant).
    pub fn is_range_like(&self) -> bool {
        matches!(self, BudgetType::Fixed | BudgetType::Hourly)
    }
}

/// Status of an application to a task. Only `pending` applications count
/// toward the badge shown to the task owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }
}

/// Whether a deadline makes a task urgent at creation time: only same-day
/// deadlines count.
pub fn is_urgent_deadline(deadline: &crate::types::Timestamp, now: &crate::types::Timestamp) -> bool {
    deadline.date_naive() == now.date_naive()
}

/// A task lookup key: either the opaque id or the human-readable slug.
///
/// The dispatch is decided once at the boundary (a canonical-UUID parse
/// test) instead of pattern-sniffing inside the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    ById(Uuid),
    BySlug(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Identifier {
        match Uuid::parse_str(raw) {
            Ok(id) => Identifier::ById(id),
            Err(_) => Identifier::BySlug(raw.to_string()),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::ById(id) => write!(f, "{id}"),
            Identifier::BySlug(slug) => f.write_str(slug),
        }
    }
}
