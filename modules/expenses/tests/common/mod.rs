//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use expenses::{
    contract::model::NewExpense,
    domain::service::{Service, ServiceConfig},
    infra::storage::{migrations::Migrator, FileExpensesRepository, SeaOrmExpensesRepository},
    ExpensesConfig, ExpensesModule,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

/// Fresh in-memory SQLite database with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn db_service() -> Arc<Service> {
    let repo = SeaOrmExpensesRepository::new(create_test_db().await);
    Arc::new(Service::new(Arc::new(repo), ServiceConfig::default()))
}

pub async fn file_service(path: &Path) -> Arc<Service> {
    let repo = FileExpensesRepository::open(path).await;
    Arc::new(Service::new(Arc::new(repo), ServiceConfig::default()))
}

pub async fn file_router(path: &Path) -> Router {
    ExpensesModule::with_file_storage(path, ExpensesConfig::default())
        .await
        .router(None, true)
}

pub async fn db_router() -> Router {
    ExpensesModule::with_database(create_test_db().await, ExpensesConfig::default())
        .await
        .expect("Failed to build database module")
        .router(None, true)
}

pub fn new_expense(description: &str, amount: f64, date: &str) -> NewExpense {
    NewExpense {
        description: Some(description.to_string()),
        amount: Some(amount),
        date: Some(date.to_string()),
        ..Default::default()
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(req)
        .await
        .expect("router is infallible")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
