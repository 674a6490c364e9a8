//! VPortal action handlers.
//!
//! One function per user-facing operation. Every action follows the same
//! shape: verify the bearer token (and the role claim where required),
//! validate the input draft, perform one or two port calls, and invalidate the
//! cached pages the mutation made stale. Results come back as tagged
//! [`ActionOutcome`] values — denials, field errors, and backend failures are
//! all data, never unwinding.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Actions sequence calls between the domain rules in
//! the [`portal`] crate and the port implementations injected through
//! [`Deps`]. They contain no domain rules of their own.

pub mod apps;
pub mod auth;
pub mod categories;
pub mod data;
pub mod outcome;
pub mod seed;
pub mod settings;
pub mod user_ops;
pub mod users;

pub use auth::BootstrapStatus;
pub use data::DashboardData;
pub use outcome::{ActionOutcome, Deps};
pub use user_ops::FavoriteToggled;
