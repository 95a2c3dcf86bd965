//! Persistence adapters for workspaces and projects.
//!
//! - [`memory`]: thread-safe in-memory storage for tests and the default
//!   storage mode
//! - [`postgres`]: `PostgreSQL` persistence using Diesel

pub mod memory;
pub mod postgres;
