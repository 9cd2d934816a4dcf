pub mod budget;
pub mod dashboard;
pub mod error;
pub mod expense;
pub mod export;
pub mod health;
pub mod income;
pub mod report;
pub mod user;
