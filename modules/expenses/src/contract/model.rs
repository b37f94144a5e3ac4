use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Pure expense model for in-process consumers (no serde)
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub owner: String,
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub tags: Vec<String>,
    pub date: NaiveDate,
    pub category: Option<String>,
}

/// Data for creating a new expense.
///
/// Fields are optional because presence is part of validation; the service
/// rejects a request missing `description`, `amount` or `date`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewExpense {
    pub description: Option<String>,
    pub amount: Option<f64>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Partial update data for an expense. `owner` and `id` are not patchable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.tags.is_none()
            && self.category.is_none()
    }
}

/// Closed category set used by backends with an enumerated category policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Health,
    Housing,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Health,
        Category::Housing,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Housing => "Housing",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn category_parsing_is_case_sensitive() {
        assert!("food".parse::<Category>().is_err());
        assert!("Groceries".parse::<Category>().is_err());
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn empty_patch() {
        assert!(ExpensePatch::default().is_empty());
        let patch = ExpensePatch {
            amount: Some(1.0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
