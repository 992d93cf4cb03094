pub mod reports_handlers;
pub mod reports_models;
