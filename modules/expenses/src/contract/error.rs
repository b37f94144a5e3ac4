use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpensesError {
    #[error("Expense not found: {owner}/{id}")]
    NotFound { owner: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl ExpensesError {
    pub fn not_found(owner: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            owner: owner.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ExpensesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            ExpenseNotFound { owner, id } => Self::not_found(owner, id),
            e @ MissingFields => Self::validation(e.to_string()),
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            Storage { .. } => Self::internal(),
        }
    }
}
