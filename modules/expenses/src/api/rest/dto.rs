use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contract::model::{Expense, ExpensePatch, NewExpense};

/// REST DTO for expense representation with serde
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDto {
    pub owner: String,
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub tags: Vec<String>,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// REST DTO for creating a new expense.
///
/// Every field is optional at the wire level so that a missing field is
/// reported by domain validation rather than by the JSON extractor. The
/// Spanish keys used by older clients are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExpenseReq {
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "valor")]
    pub amount: Option<f64>,
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(default, alias = "etiquetas")]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
}

/// REST DTO for updating an expense (partial). `owner`/`id` in the body are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpenseReq {
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "valor")]
    pub amount: Option<f64>,
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(default, alias = "etiquetas")]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub message: String,
    pub expense: ExpenseDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub storage: String,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Expense> for ExpenseDto {
    fn from(e: Expense) -> Self {
        Self {
            owner: e.owner,
            id: e.id,
            description: e.description,
            amount: e.amount,
            tags: e.tags,
            date: e.date,
            category: e.category,
        }
    }
}

impl From<CreateExpenseReq> for NewExpense {
    fn from(req: CreateExpenseReq) -> Self {
        Self {
            description: req.description,
            amount: req.amount,
            date: req.date,
            tags: req.tags,
            category: req.category,
        }
    }
}

impl From<UpdateExpenseReq> for ExpensePatch {
    fn from(req: UpdateExpenseReq) -> Self {
        Self {
            description: req.description,
            amount: req.amount,
            date: req.date,
            tags: req.tags,
            category: req.category,
        }
    }
}
