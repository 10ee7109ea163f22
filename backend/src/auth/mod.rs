//! Authentication module
//!
//! Password hashing (argon2, with bcrypt accepted for legacy rows) and
//! stateless HS256 session tokens.

mod error;
mod middleware;
mod password;
mod token;

pub use error::{CredentialError, TokenError};
pub use middleware::{authorize, AuthUser};
pub use password::PasswordService;
pub use token::{Claims, TokenService};
