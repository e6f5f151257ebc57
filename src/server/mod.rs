//! Server module for building the portal HTTP server
//!
//! - `ServerBuilder` wires configuration, repositories and collaborators
//! - `build_portal_routes` assembles the routes behind the access gate

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::build_portal_routes;
