use crate::contract::model::Expense;
use crate::domain::changes::ExpenseChanges;
use async_trait::async_trait;

/// Which persistence medium backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    File,
    Database,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "file",
            StorageKind::Database => "database",
        }
    }
}

/// How a backend treats the `category` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPolicy {
    /// Optional; any string is stored as given.
    FreeForm,
    /// Must be one of [`crate::contract::model::Category`]; missing means `Other`.
    Enumerated,
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Every mutating call must be durable before it returns `Ok`.
#[async_trait]
pub trait ExpensesRepository: Send + Sync {
    fn kind(&self) -> StorageKind;

    fn category_policy(&self) -> CategoryPolicy;

    /// All expenses of `owner` in insertion order.
    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Expense>>;

    async fn find(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>>;

    /// Insert a fully-formed domain expense.
    ///
    /// Service computes id/validation; repo persists.
    async fn insert(&self, expense: Expense) -> anyhow::Result<()>;

    /// Read, merge and write atomically. `None` when `(owner, id)` does not exist.
    async fn update(
        &self,
        owner: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> anyhow::Result<Option<Expense>>;

    /// Remove and return the prior state. `None` when `(owner, id)` does not exist.
    async fn delete(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>>;

    /// Number of expenses across all owners.
    async fn count(&self) -> anyhow::Result<u64>;

    /// Delete everything. Returns the number of removed expenses.
    async fn purge(&self) -> anyhow::Result<u64>;
}
