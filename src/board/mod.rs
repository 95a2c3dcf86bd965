//! Board lists and the tasks ordered within them.
//!
//! Tasks are appended to the end of their list when created. Their order only
//! changes through a user-initiated move, which recomputes a dense 1-based
//! ranking for every affected list and persists it in one batched write.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
