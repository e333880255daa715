//! modswap Core
//!
//! Dependency substitution for module-graph tests: bind a factory to a
//! subject module with default substitutions, materialize fresh subject
//! instances with per-call overrides merged in, reset to the unmodified
//! graph on demand.
//!
//! # Overview
//!
//! - **Replacement**: Tagged replacement behavior (`Value` swaps whole,
//!   `Record` shallow-merges)
//! - **Substitution**: Immutable `{target identity, replacement}` pair
//! - **SubstitutionSet**: Validated ordered set, one entry per target
//! - **SubjectFactory**: `materialize(overrides)` / `reset`
//!
//! # Example
//!
//! ```rust
//! use modswap_core::{Replacement, SubjectFactory, Substitution};
//! use modswap_loader::{BindingMap, ModuleLoader, ModuleRegistry, ModuleValue};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ModuleRegistry::new());
//! registry.register_value("/app/deps/greeting", ModuleValue::data("hello")).unwrap();
//! registry
//!     .register("/app/subject", |linker| {
//!         let greeting = linker.import("./deps/greeting")?;
//!         Ok(ModuleValue::record(BindingMap::new().bind("greeting", greeting)))
//!     })
//!     .unwrap();
//!
//! let default = Substitution::new(
//!     registry.as_ref(),
//!     "/app/deps/greeting",
//!     Replacement::data("goodbye"),
//! ).unwrap();
//!
//! let factory = SubjectFactory::new(
//!     registry.as_ref(),
//!     Arc::clone(&registry) as Arc<dyn ModuleLoader>,
//!     "/app/subject",
//!     default,
//! ).unwrap();
//!
//! let subject = factory.materialize(()).unwrap();
//! assert_eq!(subject.get("greeting"), Some(&ModuleValue::data("goodbye")));
//!
//! factory.reset();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod factory;
pub mod substitution;

// Re-exports
pub use error::SwapError;
pub use factory::SubjectFactory;
pub use substitution::{IntoSubstitutions, Replacement, Substitution, SubstitutionSet};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for substitution tests
    pub use crate::{
        IntoSubstitutions, Replacement, SubjectFactory, Substitution, SubstitutionSet, SwapError,
    };
    pub use modswap_loader::{
        BindingMap, Linker, LoadError, ModuleLoader, ModuleRegistry, ModuleValue, RegistryConfig,
    };
    pub use modswap_resolve::{ModuleId, ReferencePolicy, ResolveError, Resolver};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
