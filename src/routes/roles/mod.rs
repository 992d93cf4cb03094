pub mod roles_handlers;
pub mod roles_models;
