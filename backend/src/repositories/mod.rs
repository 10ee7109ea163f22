//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod learning;
pub mod skill;
pub mod user;

pub use learning::{LearningRecord, LearningRepository};
pub use skill::SkillRepository;
pub use user::{NewUser, UserRecord, UserRepository};
