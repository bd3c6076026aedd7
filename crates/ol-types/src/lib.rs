//! Shared types and error types for Octolink

pub mod errors;
pub mod token;

pub use errors::{AppError, AppResult};
pub use token::TokenResult;
