//! modswap Module Loader
//!
//! The module value model and the in-memory loader/cache the substitution
//! core installs into.
//!
//! # Overview
//!
//! - **ModuleValue**: Everything a module can export or a substitution can
//!   install (data, records, functions, opaque host values)
//! - **ModuleDefinition / Linker**: Re-executable module bodies importing
//!   their dependencies through the registry
//! - **ModuleLoader**: The injectable collaborator boundary
//!   (install / force-reload / load / reset-all)
//! - **ModuleRegistry**: The concrete in-memory implementation, with an
//!   import graph for precise reset invalidation
//!
//! # Example
//!
//! ```rust
//! use modswap_loader::{ModuleLoader, ModuleRegistry, ModuleValue};
//!
//! let registry = ModuleRegistry::new();
//! let dep = registry
//!     .register_value("/app/deps/dependency1", ModuleValue::data(1))
//!     .unwrap();
//! let subject = registry
//!     .register("/app/subject", |linker| linker.import("./deps/dependency1"))
//!     .unwrap();
//!
//! assert_eq!(registry.load(&subject).unwrap(), ModuleValue::data(1));
//!
//! registry.install(&dep, ModuleValue::data(3));
//! registry.force_reload(&subject).unwrap();
//! assert_eq!(registry.load(&subject).unwrap(), ModuleValue::data(3));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;
pub mod value;

// Re-exports
pub use definition::{Linker, ModuleDefinition};
pub use error::LoadError;
pub use loader::ModuleLoader;
pub use registry::{ModuleRegistry, RegistryConfig};
pub use value::{BindingMap, ModuleValue, NativeFn};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
