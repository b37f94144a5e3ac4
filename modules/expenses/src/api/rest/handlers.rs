use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::dto::{
    CreateExpenseReq, DeleteExpenseResponse, ExpenseDto, HealthDto, UpdateExpenseReq,
};
use crate::api::rest::error::{map_domain_error, ApiError};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub const HEALTH_STATUS: &str = "API funcionando correctamente";
pub const DELETED_MESSAGE: &str = "Gasto eliminado";

fn fail(context: &str, e: DomainError) -> ApiError {
    match e {
        DomainError::Storage { .. } => error!("{}: {}", context, e),
        _ => warn!("{}: {}", context, e),
    }
    map_domain_error(&e)
}

/// List all expenses of an owner
pub async fn list_expenses(
    Extension(svc): Extension<Arc<Service>>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<ExpenseDto>>, ApiError> {
    info!("Listing expenses of owner: {}", owner);

    match svc.list_expenses(&owner).await {
        Ok(expenses) => Ok(Json(expenses.into_iter().map(ExpenseDto::from).collect())),
        Err(e) => Err(fail("Failed to list expenses", e)),
    }
}

/// Get a specific expense
pub async fn get_expense(
    Extension(svc): Extension<Arc<Service>>,
    Path((owner, id)): Path<(String, String)>,
) -> Result<Json<ExpenseDto>, ApiError> {
    info!("Getting expense {}/{}", owner, id);

    match svc.get_expense(&owner, &id).await {
        Ok(expense) => Ok(Json(ExpenseDto::from(expense))),
        Err(e) => Err(fail(&format!("Failed to get expense {}/{}", owner, id), e)),
    }
}

/// Create a new expense.
///
/// An unreadable body counts as a request without the required fields.
pub async fn create_expense(
    Extension(svc): Extension<Arc<Service>>,
    Path(owner): Path<String>,
    body: Result<Json<CreateExpenseReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseDto>), ApiError> {
    let req_body = match body {
        Ok(Json(req_body)) => req_body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Rejected create body: {}", rejection.body_text());
            return Err(ApiError::new(rejection.status(), rejection.body_text()));
        }
        Err(rejection) => {
            warn!("Rejected create body: {}", rejection.body_text());
            return Err(map_domain_error(&DomainError::missing_fields()));
        }
    };
    info!("Creating expense for owner {}: {:?}", owner, req_body);

    match svc.create_expense(&owner, req_body.into()).await {
        Ok(expense) => Ok((StatusCode::CREATED, Json(ExpenseDto::from(expense)))),
        Err(e) => Err(fail("Failed to create expense", e)),
    }
}

/// Update an expense (partial)
pub async fn update_expense(
    Extension(svc): Extension<Arc<Service>>,
    Path((owner, id)): Path<(String, String)>,
    body: Result<Json<UpdateExpenseReq>, JsonRejection>,
) -> Result<Json<ExpenseDto>, ApiError> {
    let req_body = match body {
        Ok(Json(req_body)) => req_body,
        Err(rejection) => {
            warn!("Rejected update body: {}", rejection.body_text());
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return Err(ApiError::new(status, rejection.body_text()));
        }
    };
    info!("Updating expense {}/{}: {:?}", owner, id, req_body);

    match svc.update_expense(&owner, &id, req_body.into()).await {
        Ok(expense) => Ok(Json(ExpenseDto::from(expense))),
        Err(e) => Err(fail(&format!("Failed to update expense {}/{}", owner, id), e)),
    }
}

/// Delete an expense and return what was removed
pub async fn delete_expense(
    Extension(svc): Extension<Arc<Service>>,
    Path((owner, id)): Path<(String, String)>,
) -> Result<Json<DeleteExpenseResponse>, ApiError> {
    info!("Deleting expense {}/{}", owner, id);

    match svc.delete_expense(&owner, &id).await {
        Ok(expense) => Ok(Json(DeleteExpenseResponse {
            message: DELETED_MESSAGE.to_string(),
            expense: ExpenseDto::from(expense),
        })),
        Err(e) => Err(fail(&format!("Failed to delete expense {}/{}", owner, id), e)),
    }
}

pub async fn health_check(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<HealthDto>, ApiError> {
    match svc.count_expenses().await {
        Ok(total_count) => Ok(Json(HealthDto {
            status: HEALTH_STATUS.to_string(),
            storage: svc.storage_kind().as_str().to_string(),
            total_count,
        })),
        Err(e) => Err(fail("Health check failed", e)),
    }
}
