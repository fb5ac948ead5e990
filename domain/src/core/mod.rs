//! Core domain concepts shared across all subdomains.
//!
//! - [`backend::BackendSelector`]: which provider/model answers for a participant
//! - [`topic::Topic`]: a validated discussion topic
//! - [`error::DomainError`]: domain-level errors

pub mod backend;
pub mod error;
pub mod string;
pub mod topic;
