pub mod entity;
pub mod file_repo;
pub mod mapper;
pub mod migrations;
pub mod record;
pub mod sea_orm_repo;

pub use file_repo::FileExpensesRepository;
pub use sea_orm_repo::SeaOrmExpensesRepository;
