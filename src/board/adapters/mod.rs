//! Persistence adapters for board lists and tasks.
//!
//! - [`memory::InMemoryBoardRepository`]: thread-safe in-memory storage
//! - [`postgres::PostgresBoardRepository`]: `PostgreSQL` persistence using
//!   Diesel, with reorders applied as a single `UPDATE ... FROM unnest(...)`

pub mod memory;
pub mod postgres;
