//! revdb-core - Core library for revdb.
//!
//! This crate provides the application record types and the in-memory
//! versioned store behind the revdb server. Every mutation is kept as an
//! immutable revision; a background compactor bounds how much history is
//! retained per key.
//!
//! # Example
//!
//! ```
//! use revdb_core::{Application, ListFilter, VersionedStore};
//!
//! let store = VersionedStore::new();
//! store.create(&Application::new("nginx", "1.25").with_source("acme")).unwrap();
//! store.update(&Application::new("nginx", "1.26").with_source("acme")).unwrap();
//!
//! let current = store.get("nginx").unwrap();
//! assert_eq!(current.resource_version, "1");
//!
//! store.delete("nginx").unwrap();
//! assert!(store.get("nginx").is_err());
//! assert_eq!(store.dump_key("nginx").unwrap().len(), 3);
//! assert!(store.list(&ListFilter::new()).is_empty());
//! ```

pub mod codec;
pub mod compaction;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use codec::{for_each_application, ApplicationStream, BulkReport};
pub use compaction::{Compactor, CompactorHandle};
pub use config::CompactionConfig;
pub use error::{ErrorCode, RevError, RevResult};
pub use store::{CompactionReport, RevisionLog, VersionedStore};
pub use types::{Application, FilterField, ListFilter, Maintainer};
pub use validation::validate_application;
