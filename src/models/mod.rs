// src/models/mod.rs

pub mod area;
pub mod due_bucket;
pub mod role;
pub mod session;
pub mod task;
