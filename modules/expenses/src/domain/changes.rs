use chrono::NaiveDate;

use crate::contract::model::Expense;

/// A validated partial update. Produced from an [`crate::contract::model::ExpensePatch`]
/// by the service and merged by the repository under its own lock or transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl ExpenseChanges {
    /// Merge field by field. `owner` and `id` are never touched.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(tags) = &self.tags {
            expense.tags = tags.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(category) = &self.category {
            expense.category = Some(category.clone());
        }
    }
}
