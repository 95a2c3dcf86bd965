//! Taskboard: workspaces, projects, and kanban boards behind a JSON API.
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain**: validated values and aggregates with no infrastructure
//!   dependencies
//! - **Ports**: repository traits the services depend on
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//! - **Services**: orchestration that threads the calling [`identity::Actor`]
//!   through every operation
//!
//! # Modules
//!
//! - [`workspace`]: workspaces, team membership, projects, and stars
//! - [`board`]: board lists, tasks, and the drag-and-drop reorder engine
//! - [`slug`]: slug derivation and the collision policy
//! - [`http`]: axum router, extractors, and error mapping
//! - [`config`]: environment configuration

pub mod board;
pub mod config;
pub mod http;
pub mod identity;
pub mod slug;
pub mod workspace;
