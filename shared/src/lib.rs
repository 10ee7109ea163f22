//! Software Slayer Shared Library
//!
//! This crate contains the wire types, domain models and validation rules
//! shared between the API server and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::LearningCategory;
pub use types::*;
