pub mod areas_handlers;
pub mod areas_models;
