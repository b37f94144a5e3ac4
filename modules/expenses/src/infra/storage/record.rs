//! On-disk shape of an expense in the JSON data file.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::contract::model::Expense;
use crate::domain::validation::parse_expense_date;

/// One element of the persisted JSON array.
///
/// Files written by earlier releases used Spanish keys and full timestamps for
/// the date; both are accepted when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(alias = "usuario")]
    pub owner: String,
    #[serde(alias = "gastoId")]
    pub id: String,
    #[serde(alias = "descripcion")]
    pub description: String,
    #[serde(alias = "valor")]
    pub amount: f64,
    #[serde(default, alias = "etiquetas")]
    pub tags: Vec<String>,
    #[serde(
        alias = "fecha",
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    pub date: NaiveDate,
    #[serde(default, alias = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn serialize_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format("%Y-%m-%d"))
}

fn deserialize_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse_expense_date(&raw).map_err(serde::de::Error::custom)
}

impl From<Expense> for ExpenseRecord {
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

impl From<ExpenseRecord> for Expense {
    fn from(r: ExpenseRecord) -> Self {
        Self {
            owner: r.owner,
            id: r.id,
            description: r.description,
            amount: r.amount,
            tags: r.tags,
            date: r.date,
            category: r.category,
        }
    }
}
