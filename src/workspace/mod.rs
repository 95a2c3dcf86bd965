//! Workspaces, their members, and the projects they group.
//!
//! A workspace is created by a user who becomes its first admin. Admins
//! rename the workspace and toggle other users' membership. Projects live in
//! exactly one workspace at a time; private projects are only visible to
//! their owner and to global admins. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
