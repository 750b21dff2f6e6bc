//! Semantic validation of create/update payloads.
//!
//! Shape-level checks (required fields, types) happen at deserialization;
//! these functions enforce the business rules that serde cannot express.

use rust_decimal::Decimal;
use validator::ValidateUrl;

use crate::error::CoreError;
use crate::task::{BudgetType, MAX_TASK_IMAGES};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Validate the title of a task.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must not exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the description of a task.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "description must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "description must not exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate budget bounds against the budget type.
///
/// For range-like types with both bounds present, `max` must exceed `min`.
/// Negative amounts are rejected outright.
pub fn validate_budget(
    budget_type: BudgetType,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<(), CoreError> {
    for bound in [min, max].into_iter().flatten() {
        if bound < Decimal::ZERO {
            return Err(CoreError::Validation(
                "budget amounts must not be negative".into(),
            ));
        }
    }
    if budget_type.is_range_like() {
        if let (Some(min), Some(max)) = (min, max) {
            if max <= min {
                return Err(CoreError::Validation(
                    "budgetMax must be greater than budgetMin".into(),
                ));
            }
        }
    }
    Ok(())
}

/// Validate the attached image list: at most [`MAX_TASK_IMAGES`] entries,
/// each a well-formed URL.
pub fn validate_images(images: &[String]) -> Result<(), CoreError> {
    if images.len() > MAX_TASK_IMAGES {
        return Err(CoreError::Validation(format!(
            "at most {MAX_TASK_IMAGES} images are allowed"
        )));
    }
    for url in images {
        if !url.validate_url() {
            return Err(CoreError::Validation(format!(
                "invalid image URL: {url}"
            )));
        }
    }
    Ok(())
}
