//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: the validated problem statement a deliberation works on
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod question;
