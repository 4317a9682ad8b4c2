#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`router`]: Route table and middleware wiring (`build_router`)
//! - [`state`]: Shared handler state (`AppState`)
//! - [`auth`]: HTTP Basic authentication (`Credentials`, `require_basic_auth`)
//! - [`payload`]: Tagged payload decoder (`Payload`, `PayloadEncoding`, `PayloadShape`)
//! - [`pagination`]: Page selection (`Paging`, `PageConfig`)
//! - [`error`]: Error to response mapping (`ApiError`)
//! - [`handlers`]: Per-resource request handlers
//!
//! # Request Flow
//!
//! ```text
//! request --> track_requests --> require_basic_auth --> handler
//!                                                         |
//!                        Payload<T> / Paging extractors --+--> registry handles
//!                                                         |
//!                                   Json<T> | Json<Page<T>> | ApiError
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod payload;
pub mod router;
pub mod state;

// --- Public API Re-exports ---

pub use auth::Credentials;
pub use error::ApiError;
pub use pagination::{PageConfig, Paging};
pub use payload::{Payload, PayloadEncoding};
pub use router::build_router;
pub use state::AppState;
