//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it runs on a
//! `DatabaseConnection` for SQLite or Postgres. Read–merge–write operations
//! open their own transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::contract::model::Expense;
use crate::domain::changes::ExpenseChanges;
use crate::domain::repo::{CategoryPolicy, ExpensesRepository, StorageKind};
use crate::infra::storage::entity::{
    ActiveModel as ExpenseAM, Column, Entity as ExpenseEntity, Model as ExpenseRow,
};
use crate::infra::storage::mapper::{entity_to_contract, tags_to_json};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmExpensesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmExpensesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

async fn find_row<C>(conn: &C, owner: &str, id: &str) -> anyhow::Result<Option<ExpenseRow>>
where
    C: ConnectionTrait,
{
    ExpenseEntity::find()
        .filter(Column::Owner.eq(owner))
        .filter(Column::ExpenseId.eq(id))
        .one(conn)
        .await
        .context("find failed")
}

#[async_trait::async_trait]
impl<C> ExpensesRepository for SeaOrmExpensesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    fn kind(&self) -> StorageKind {
        StorageKind::Database
    }

    fn category_policy(&self) -> CategoryPolicy {
        CategoryPolicy::Enumerated
    }

    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Expense>> {
        let rows = ExpenseEntity::find()
            .filter(Column::Owner.eq(owner))
            .order_by_asc(Column::Seq)
            .all(&self.conn)
            .await
            .context("list_by_owner failed")?;
        rows.into_iter().map(entity_to_contract).collect()
    }

    async fn find(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>> {
        find_row(&self.conn, owner, id)
            .await?
            .map(entity_to_contract)
            .transpose()
    }

    async fn insert(&self, e: Expense) -> anyhow::Result<()> {
        let m = ExpenseAM {
            owner: Set(e.owner),
            expense_id: Set(e.id),
            description: Set(e.description),
            amount: Set(e.amount),
            tags: Set(tags_to_json(&e.tags)),
            date: Set(e.date),
            category: Set(e.category),
            ..Default::default()
        };
        let _ = m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> anyhow::Result<Option<Expense>> {
        let txn = self.conn.begin().await.context("update: begin failed")?;

        let Some(row) = find_row(&txn, owner, id).await? else {
            txn.rollback().await.context("update: rollback failed")?;
            return Ok(None);
        };

        let mut merged = entity_to_contract(row.clone())?;
        changes.apply_to(&mut merged);

        let mut m: ExpenseAM = row.into();
        m.description = Set(merged.description.clone());
        m.amount = Set(merged.amount);
        m.tags = Set(tags_to_json(&merged.tags));
        m.date = Set(merged.date);
        m.category = Set(merged.category.clone());
        let _ = m.update(&txn).await.context("update failed")?;

        txn.commit().await.context("update: commit failed")?;
        Ok(Some(merged))
    }

    async fn delete(&self, owner: &str, id: &str) -> anyhow::Result<Option<Expense>> {
        let txn = self.conn.begin().await.context("delete: begin failed")?;

        let Some(row) = find_row(&txn, owner, id).await? else {
            txn.rollback().await.context("delete: rollback failed")?;
            return Ok(None);
        };

        let res = ExpenseEntity::delete_by_id(row.seq)
            .exec(&txn)
            .await
            .context("delete failed")?;
        txn.commit().await.context("delete: commit failed")?;

        if res.rows_affected == 0 {
            return Ok(None);
        }
        entity_to_contract(row).map(Some)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        ExpenseEntity::find()
            .count(&self.conn)
            .await
            .context("count failed")
    }

    async fn purge(&self) -> anyhow::Result<u64> {
        let res = ExpenseEntity::delete_many()
            .exec(&self.conn)
            .await
            .context("purge failed")?;
        Ok(res.rows_affected)
    }
}
