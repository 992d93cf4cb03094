pub mod assignments_handlers;
pub mod assignments_models;
