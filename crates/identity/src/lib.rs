//! VPortal identity-service infrastructure adapter.
//!
//! Implements the [`portal::TokenVerifier`] and [`portal::IdentityDirectory`]
//! traits against the hosted identity service's admin REST API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting, and response
//! parsing live here. The [`portal`] crate sees only the two traits.
//!
//! Two implementations:
//!
//! - [`RestIdentity`] — the hosted service, over HTTP.
//! - [`StaticIdentity`] — a fixed token→claims map for tests and local runs.

pub mod fixed;
pub mod rest;

pub use fixed::StaticIdentity;
pub use rest::RestIdentity;
