//! VPortal document-store infrastructure adapter.
//!
//! Implements the repository traits defined in the [`portal`] crate
//! ([`portal::AppRepository`], [`portal::CategoryRepository`],
//! [`portal::SettingsRepository`], [`portal::ProfileRepository`]) against the
//! hosted document database's REST protocol.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. All protocol
//! details (paths, envelopes, merge semantics, authentication) are handled
//! here; the [`portal`] crate never sees them.
//!
//! Two implementations:
//!
//! - [`RestDocStore`] — the hosted database, over HTTP.
//! - [`MemoryStore`] — an in-process double for tests and local runs, proving
//!   the storage technology is swappable behind the ports.

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestDocStore;
