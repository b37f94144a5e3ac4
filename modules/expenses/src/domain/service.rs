use std::sync::Arc;

use crate::contract::model::{Expense, ExpensePatch, NewExpense};
use crate::domain::error::DomainError;
use crate::domain::repo::{ExpensesRepository, StorageKind};
use crate::domain::validation::{validate_new_expense, validate_patch};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Domain service with business rules for expense management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ExpensesRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    pub max_description_length: usize,
    pub max_tags: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_description_length: 500,
            max_tags: 50,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn ExpensesRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.repo.kind()
    }

    #[instrument(name = "expenses.service.list_expenses", skip(self), fields(owner = %owner))]
    pub async fn list_expenses(&self, owner: &str) -> Result<Vec<Expense>, DomainError> {
        debug!("Listing expenses");

        let expenses = self
            .repo
            .list_by_owner(owner)
            .await
            .map_err(DomainError::storage)?;

        debug!("Successfully listed {} expenses", expenses.len());
        Ok(expenses)
    }

    #[instrument(
        name = "expenses.service.get_expense",
        skip(self),
        fields(owner = %owner, expense_id = %id)
    )]
    pub async fn get_expense(&self, owner: &str, id: &str) -> Result<Expense, DomainError> {
        debug!("Getting expense by id");

        let expense = self
            .repo
            .find(owner, id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::expense_not_found(owner, id))?;
        debug!("Successfully retrieved expense");
        Ok(expense)
    }

    #[instrument(
        name = "expenses.service.create_expense",
        skip(self, new_expense),
        fields(owner = %owner)
    )]
    pub async fn create_expense(
        &self,
        owner: &str,
        new_expense: NewExpense,
    ) -> Result<Expense, DomainError> {
        info!("Creating new expense");

        let id = Uuid::new_v4().to_string();
        let expense = validate_new_expense(
            owner,
            id,
            new_expense,
            self.repo.category_policy(),
            &self.config,
        )?;

        self.repo
            .insert(expense.clone())
            .await
            .map_err(DomainError::storage)?;

        info!("Successfully created expense with id={}", expense.id);
        Ok(expense)
    }

    #[instrument(
        name = "expenses.service.update_expense",
        skip(self, patch),
        fields(owner = %owner, expense_id = %id)
    )]
    pub async fn update_expense(
        &self,
        owner: &str,
        id: &str,
        patch: ExpensePatch,
    ) -> Result<Expense, DomainError> {
        info!("Updating expense");

        // Nothing to merge, so nothing to write
        if patch.is_empty() {
            debug!("Empty patch, returning the stored expense");
            return self.get_expense(owner, id).await;
        }

        let changes = validate_patch(patch, self.repo.category_policy(), &self.config)?;

        let updated = self
            .repo
            .update(owner, id, &changes)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::expense_not_found(owner, id))?;

        info!("Successfully updated expense");
        Ok(updated)
    }

    #[instrument(
        name = "expenses.service.delete_expense",
        skip(self),
        fields(owner = %owner, expense_id = %id)
    )]
    pub async fn delete_expense(&self, owner: &str, id: &str) -> Result<Expense, DomainError> {
        info!("Deleting expense");

        let deleted = self
            .repo
            .delete(owner, id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::expense_not_found(owner, id))?;

        info!("Successfully deleted expense");
        Ok(deleted)
    }

    #[instrument(name = "expenses.service.count_expenses", skip(self))]
    pub async fn count_expenses(&self) -> Result<u64, DomainError> {
        self.repo.count().await.map_err(DomainError::storage)
    }

    /// Remove every expense of every owner. Used by the seeding command.
    #[instrument(name = "expenses.service.purge_expenses", skip(self))]
    pub async fn purge_expenses(&self) -> Result<u64, DomainError> {
        let removed = self.repo.purge().await.map_err(DomainError::storage)?;
        info!("Purged {} expenses", removed);
        Ok(removed)
    }
}
