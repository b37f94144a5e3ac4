pub mod client;
pub mod error;
pub mod model;

pub use client::ExpensesApi;
pub use error::ExpensesError;
pub use model::{Category, Expense, ExpensePatch, NewExpense};
