use async_trait::async_trait;

use crate::contract::{
    error::ExpensesError,
    model::{Expense, ExpensePatch, NewExpense},
};

/// Public API trait for the expenses module that other modules can use
#[async_trait]
pub trait ExpensesApi: Send + Sync {
    /// List all expenses of an owner in store order
    async fn list_expenses(&self, owner: &str) -> Result<Vec<Expense>, ExpensesError>;

    /// Get a single expense
    async fn get_expense(&self, owner: &str, id: &str) -> Result<Expense, ExpensesError>;

    /// Create a new expense; the store assigns the id
    async fn create_expense(
        &self,
        owner: &str,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpensesError>;

    /// Update an expense with partial data
    async fn update_expense(
        &self,
        owner: &str,
        id: &str,
        patch: ExpensePatch,
    ) -> Result<Expense, ExpensesError>;

    /// Delete an expense, returning its last state
    async fn delete_expense(&self, owner: &str, id: &str) -> Result<Expense, ExpensesError>;
}
