use anyhow::Context;

use crate::contract::model::Expense;
use crate::infra::storage::entity::Model as ExpenseEntity;

/// Convert a database row to a contract model
pub fn entity_to_contract(entity: ExpenseEntity) -> anyhow::Result<Expense> {
    let tags: Vec<String> = serde_json::from_value(entity.tags).with_context(|| {
        format!(
            "tags of expense {}/{} are not a list of strings",
            entity.owner, entity.expense_id
        )
    })?;

    Ok(Expense {
        owner: entity.owner,
        id: entity.expense_id,
        description: entity.description,
        amount: entity.amount,
        tags,
        date: entity.date,
        category: entity.category,
    })
}

/// JSON value stored in the `tags` column
pub fn tags_to_json(tags: &[String]) -> serde_json::Value {
    serde_json::Value::from(tags.to_vec())
}
