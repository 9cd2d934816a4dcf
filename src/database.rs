pub mod budget;
pub mod dashboard;
pub mod expense;
pub mod income;
pub mod postgres_repository;
pub mod session;
pub mod user;
