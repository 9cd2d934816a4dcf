pub mod budget_summary;
pub mod dashboard;
pub mod export;
pub mod report;
