//! Error types for reference resolution
//!
//! All variants surface at construction time: a malformed reference is
//! rejected before a `Substitution` or `SubjectFactory` ever exists.

use crate::reference::RefKind;

/// Errors raised while validating and resolving module references
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No reference supplied
    #[error("module reference is required")]
    MissingReference,

    /// Reference kind disallowed by the active policy
    #[error("{kind} reference '{reference}' is not allowed by the active policy")]
    InvalidReferenceKind {
        /// The offending reference as supplied
        reference: String,
        /// Its classified kind
        kind: RefKind,
    },

    /// Policy requires canonical absolute identities
    #[error("module path must be absolute: '{reference}'")]
    PathNotAbsolute {
        /// The offending reference as supplied
        reference: String,
    },

    /// The referenced module does not exist
    #[error("module not found: '{reference}'")]
    NotFound {
        /// The reference that failed to resolve
        reference: String,
    },
}
