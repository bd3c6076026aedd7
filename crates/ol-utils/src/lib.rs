//! Shared utilities for Octolink

pub mod crypto;

pub use crypto::{constant_time_eq, random_bytes, to_base64url};
