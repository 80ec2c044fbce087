//! # Lead Qualifier Common Library
//!
//! Shared code for the lead qualifier service:
//! - Error types
//! - Configuration resolution
//! - Database schema, seed import and typed accessors
//! - Timestamp parsing

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
