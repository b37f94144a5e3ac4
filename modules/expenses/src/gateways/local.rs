use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ExpensesApi,
    error::ExpensesError,
    model::{Expense, ExpensePatch, NewExpense},
};
use crate::domain::service::Service;

/// Local implementation of the ExpensesApi trait that delegates to the domain service
pub struct ExpensesLocalClient {
    service: Arc<Service>,
}

impl ExpensesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ExpensesApi for ExpensesLocalClient {
    async fn list_expenses(&self, owner: &str) -> Result<Vec<Expense>, ExpensesError> {
        self.service.list_expenses(owner).await.map_err(Into::into)
    }

    async fn get_expense(&self, owner: &str, id: &str) -> Result<Expense, ExpensesError> {
        self.service.get_expense(owner, id).await.map_err(Into::into)
    }

    async fn create_expense(
        &self,
        owner: &str,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpensesError> {
        self.service
            .create_expense(owner, new_expense)
            .await
            .map_err(Into::into)
    }

    async fn update_expense(
        &self,
        owner: &str,
        id: &str,
        patch: ExpensePatch,
    ) -> Result<Expense, ExpensesError> {
        self.service
            .update_expense(owner, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_expense(&self, owner: &str, id: &str) -> Result<Expense, ExpensesError> {
        self.service
            .delete_expense(owner, id)
            .await
            .map_err(Into::into)
    }
}
