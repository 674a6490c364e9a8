//! VPortal dashboard view-state.
//!
//! The dashboard client holds an in-memory list of apps, categories,
//! favorites, and recents, and lets the user search, filter, reorder
//! categories by drag, and toggle favorites optimistically. This crate models
//! that state as plain data with reducer-style transitions, so any rendering
//! front end can drive it and every behavior is unit-testable without a
//! browser.
//!
//! ## Architectural Layer
//!
//! **Client domain logic.** The single port here is [`OrderStore`], the
//! key-value storage the category order persists through.

pub mod order;
pub mod state;

pub use order::{MemoryOrderStore, OrderStore, CATEGORY_ORDER_KEY};
pub use state::{DashboardState, FavoriteSnapshot};
