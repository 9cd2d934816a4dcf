pub mod budget;
pub mod budget_summary;
pub mod dashboard;
pub mod entry;
pub mod expense;
pub mod health;
pub mod income;
pub mod pagination;
pub mod report;
pub mod session;
pub mod user;
