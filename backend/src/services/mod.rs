//! Business logic services
//!
//! Services validate input, call repositories and map storage failures to
//! API errors.

pub mod learning;
pub mod skill;
pub mod user;

pub use learning::LearningService;
pub use skill::SkillService;
pub use user::UserService;
