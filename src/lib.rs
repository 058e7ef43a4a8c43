//! Bearer-token group gate for axum services.
//!
//! The gate reads the `Authorization: Bearer <jwt>` header, decodes the JWT
//! payload *without* verifying its signature, and forwards the request only
//! when the configured groups claim contains at least one allowed group.
//! Token authenticity must be established upstream.
//!
//! ```ignore
//! let gate = GroupGate::new("admin-api", GateConfig::with_groups(["ops"]))?;
//! let router = middleware::authz::apply(router, Arc::new(gate));
//! ```

pub mod api;
pub mod app;
pub mod authz;
pub mod config;
pub mod error;
pub mod middleware;

pub use authz::{ConfigError, GateConfig, GroupGate, GroupPolicy};
pub use error::GateError;
