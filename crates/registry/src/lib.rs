#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`catalog`]: Reference vocabularies (`Catalogs`, `ReferenceCatalog`, `CatalogKind`)
//! - [`store`]: Shared entity store (`Store`)
//! - [`descriptor`]: Descriptor registry (`DescriptorRegistry`, `Upsert`)
//! - [`environment`]: Test environment composer (`EnvironmentComposer`)
//! - [`jobs`]: Job lifecycle (`JobLifecycleManager`)
//!
//! # Architecture
//!
//! ```text
//!   Arc<Catalogs> (read-only)
//!          |
//!     Arc<Store> ── RwLock<State>
//!          |
//!   +------+---------------+--------------------+
//!   |                      |                    |
//! DescriptorRegistry  EnvironmentComposer  JobLifecycleManager
//!   ^                      |
//!   +-- find_or_create ----+
//! ```

pub mod catalog;
pub mod descriptor;
pub mod environment;
pub mod jobs;
pub mod store;

// --- Public API Re-exports ---

pub use catalog::{CatalogKind, Catalogs, ReferenceCatalog};
pub use descriptor::{DescriptorRegistry, Upsert};
pub use environment::EnvironmentComposer;
pub use jobs::JobLifecycleManager;
pub use store::Store;
