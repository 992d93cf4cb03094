pub mod routes;

pub mod areas;
pub mod assignments;
pub mod auth;
pub mod reports;
pub mod roles;
pub mod tasks;
pub mod users;
