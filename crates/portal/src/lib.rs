//! Core domain for VPortal.
//!
//! This crate contains every domain concept, newtype identifier, entity type,
//! input schema, and cross-cutting error type used throughout the portal.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`AppId`, `CategoryId`, etc.) |
//! | [`types`] | Entities and value types (`App`, `Category`, `Role`, `Claims`, etc.) |
//! | [`schema`] | Parse-to-typed-record input validation (`AppDraft` → `AppInput`) |
//! | [`guard`] | Authorization guard (`require_admin` / `require_user`) |
//! | [`errors`] | Store/identity error and retry-policy types, [`Denial`] |
//! | [`ports`] | Port traits implemented by the infrastructure crates |

pub mod errors;
pub mod guard;
pub mod identifiers;
pub mod ports;
pub mod schema;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{Denial, IdentityError, RetryPolicy, StoreError};
pub use identifiers::{AppId, CategoryId, Email, UserId};
pub use ports::{
    AppRepository, CategoryRepository, IdentityDirectory, NoopPageCache, PageCache, PagePath,
    ProfileRepository, SettingsRepository, TokenVerifier,
};
pub use schema::{
    AppDraft, AppInput, CategoryDraft, CategoryInput, FieldError, SettingsDraft, SettingsInput,
    SortOrderDraft,
};
pub use types::{
    App, Category, Claims, Role, Settings, Timestamp, UserAccount, UserProfile,
};
