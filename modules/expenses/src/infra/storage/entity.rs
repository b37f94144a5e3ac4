use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// One document of the `expenses` collection.
///
/// `seq` is a surrogate key that preserves insertion order; the domain
/// identity is the unique pair `(owner, expense_id)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i32,
    pub owner: String,
    pub expense_id: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub amount: f64,
    pub tags: Json,
    pub date: Date,
    pub category: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Storage metadata, kept apart from the user supplied `date`.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
