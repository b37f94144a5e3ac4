//! Sample data used by the `seed` command.

use tracing::info;

use crate::contract::model::{Category, NewExpense};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Outcome of [`seed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub removed: u64,
    pub inserted: usize,
}

fn sample(
    description: &str,
    amount: f64,
    tags: &[&str],
    category: Category,
    date: &str,
) -> NewExpense {
    NewExpense {
        description: Some(description.to_string()),
        amount: Some(amount),
        date: Some(date.to_string()),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        category: Some(category.as_str().to_string()),
    }
}

/// The fixed sample set: six expenses for `juan`, two for `maria`.
pub fn sample_expenses() -> Vec<(&'static str, NewExpense)> {
    use Category::*;
    vec![
        ("juan", sample("Café en la cafetería", 3.50, &["café", "desayuno"], Food, "2025-01-15")),
        ("juan", sample("Gasolina", 45.00, &["coche", "combustible"], Transport, "2025-01-14")),
        ("juan", sample("Entrada cine", 12.50, &["cine", "películas"], Entertainment, "2025-01-13")),
        ("juan", sample("Farmacia - Medicinas", 28.30, &["medicina", "farmacia"], Health, "2025-01-12")),
        ("juan", sample("Comida en restaurante", 25.80, &["restaurante", "cena"], Food, "2025-01-11")),
        ("juan", sample("Pago renta mes", 800.00, &["vivienda", "alquiler"], Housing, "2025-01-10")),
        ("maria", sample("Compra ropa", 65.00, &["ropa", "compras"], Other, "2025-01-15")),
        ("maria", sample("Uber a casa", 18.50, &["taxi", "transporte"], Transport, "2025-01-14")),
    ]
}

/// Replace the whole store content with [`sample_expenses`].
pub async fn seed(service: &Service) -> Result<SeedReport, DomainError> {
    let removed = service.purge_expenses().await?;

    let samples = sample_expenses();
    let inserted = samples.len();
    for (owner, new_expense) in samples {
        let created = service.create_expense(owner, new_expense).await?;
        info!(owner, id = %created.id, "Seeded expense '{}'", created.description);
    }

    info!(removed, inserted, "Seeding finished");
    Ok(SeedReport { removed, inserted })
}
