use thiserror::Error;

/// Message returned when a create request lacks one of the required fields.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Se requieren los campos: descripcion, valor, fecha";

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Expense not found: {owner}/{id}")]
    ExpenseNotFound { owner: String, id: String },

    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingFields,

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn expense_not_found(owner: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ExpenseNotFound {
            owner: owner.into(),
            id: id.into(),
        }
    }

    pub fn missing_fields() -> Self {
        Self::MissingFields
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a repository failure. The full `anyhow` chain is kept in the message.
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{:#}", err),
        }
    }
}
