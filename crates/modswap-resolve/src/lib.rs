//! modswap Reference Resolution
//!
//! Module references, canonical identities and the resolver boundary.
//!
//! # Overview
//!
//! The resolve crate provides:
//! - **ModuleRef**: Classified raw references (bare name, relative, absolute)
//! - **ModuleId**: Canonical, comparable module identity
//! - **Resolver**: Boundary trait turning references into identities
//! - **ReferencePolicy**: Which reference kinds a deployment accepts
//!
//! # Example
//!
//! ```rust
//! use modswap_resolve::{ModuleRef, RefKind, canonicalize};
//!
//! let reference = ModuleRef::parse("../deps/dependency1").unwrap();
//! assert_eq!(reference.kind(), RefKind::Relative);
//!
//! let id = canonicalize(&reference, "/app/subject");
//! assert_eq!(id.as_str(), "/app/deps/dependency1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod identity;
pub mod reference;
pub mod resolver;

// Re-exports
pub use error::ResolveError;
pub use identity::{canonicalize, ModuleId};
pub use reference::{ModuleRef, RefKind};
pub use resolver::{ReferencePolicy, Resolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
