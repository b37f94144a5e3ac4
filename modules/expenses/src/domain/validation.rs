//! Field validation for create and update payloads.
//!
//! Plain functions over the contract types; storage backends never see
//! unvalidated input.

use chrono::{DateTime, NaiveDate};

use crate::contract::model::{Category, Expense, ExpensePatch, NewExpense};
use crate::domain::changes::ExpenseChanges;
use crate::domain::error::DomainError;
use crate::domain::repo::CategoryPolicy;
use crate::domain::service::ServiceConfig as Limits;

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is kept).
pub fn parse_expense_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.date_naive())
        .map_err(|_| {
            DomainError::validation("date", format!("'{}' is not a valid date (YYYY-MM-DD)", raw))
        })
}

/// Build the stored record for a create request.
///
/// Missing or empty `description`/`date` and a missing `amount` are reported
/// together as [`DomainError::MissingFields`].
pub fn validate_new_expense(
    owner: &str,
    id: String,
    new_expense: NewExpense,
    policy: CategoryPolicy,
    limits: &Limits,
) -> Result<Expense, DomainError> {
    let NewExpense {
        description,
        amount,
        date,
        tags,
        category,
    } = new_expense;

    let (Some(description), Some(amount), Some(date)) = (
        description.filter(|d| !d.is_empty()),
        amount,
        date.filter(|d| !d.is_empty()),
    ) else {
        return Err(DomainError::missing_fields());
    };

    validate_description(&description, limits)?;
    validate_amount(amount)?;
    let tags = tags.unwrap_or_default();
    validate_tags(&tags, limits)?;

    Ok(Expense {
        owner: owner.to_string(),
        id,
        description,
        amount,
        tags,
        date: parse_expense_date(&date)?,
        category: resolve_category(category, policy)?,
    })
}

/// Validate every present field of a patch and convert it to typed changes.
pub fn validate_patch(
    patch: ExpensePatch,
    policy: CategoryPolicy,
    limits: &Limits,
) -> Result<ExpenseChanges, DomainError> {
    if let Some(ref description) = patch.description {
        validate_description(description, limits)?;
    }
    if let Some(amount) = patch.amount {
        validate_amount(amount)?;
    }
    if let Some(ref tags) = patch.tags {
        validate_tags(tags, limits)?;
    }
    let date = patch.date.as_deref().map(parse_expense_date).transpose()?;
    let category = match patch.category {
        Some(c) => resolve_category(Some(c), policy)?,
        None => None,
    };

    Ok(ExpenseChanges {
        description: patch.description,
        amount: patch.amount,
        tags: patch.tags,
        date,
        category,
    })
}

fn validate_description(description: &str, limits: &Limits) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("description", "must not be empty"));
    }
    let len = description.chars().count();
    if len > limits.max_description_length {
        return Err(DomainError::validation(
            "description",
            format!(
                "too long: {} characters (max: {})",
                len, limits.max_description_length
            ),
        ));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), DomainError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DomainError::validation(
            "amount",
            "must be a number greater than or equal to 0",
        ));
    }
    Ok(())
}

fn validate_tags(tags: &[String], limits: &Limits) -> Result<(), DomainError> {
    if tags.len() > limits.max_tags {
        return Err(DomainError::validation(
            "tags",
            format!("too many tags: {} (max: {})", tags.len(), limits.max_tags),
        ));
    }
    Ok(())
}

fn resolve_category(
    category: Option<String>,
    policy: CategoryPolicy,
) -> Result<Option<String>, DomainError> {
    match policy {
        CategoryPolicy::FreeForm => Ok(category),
        CategoryPolicy::Enumerated => {
            let parsed = match category {
                None => Category::default(),
                Some(raw) => raw.parse::<Category>().map_err(|reason| {
                    DomainError::validation(
                        "category",
                        format!(
                            "{}; expected one of {}",
                            reason,
                            Category::ALL.map(|c| c.as_str()).join(", ")
                        ),
                    )
                })?,
            };
            Ok(Some(parsed.as_str().to_string()))
        }
    }
}
