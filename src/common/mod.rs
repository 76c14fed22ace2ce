//! Common module - Errors, shared types and collaborator traits

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
