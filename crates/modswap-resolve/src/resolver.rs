//! The resolver boundary
//!
//! Provides the [`Resolver`] trait the core depends on and
//! [`ReferencePolicy`], which decides the reference kinds a deployment
//! accepts before normalization runs.

use crate::error::ResolveError;
use crate::identity::ModuleId;
use crate::reference::{ModuleRef, RefKind};
use serde::{Deserialize, Serialize};

/// Boundary trait: turn a raw reference into a canonical identity
///
/// Implementations must guarantee that two references denoting the same
/// physical module resolve to equal identities, and must fail with
/// [`ResolveError::NotFound`] when the target does not exist.
pub trait Resolver: Send + Sync {
    /// Resolve a reference with no calling context
    ///
    /// # Errors
    /// Any [`ResolveError`] variant, all raised synchronously.
    fn resolve(&self, reference: &str) -> Result<ModuleId, ResolveError>;

    /// Resolve a reference from inside `importer`
    ///
    /// Relative references resolve against the importer's directory.
    /// The default implementation ignores the context.
    ///
    /// # Errors
    /// Same as [`Resolver::resolve`].
    fn resolve_from(
        &self,
        reference: &str,
        importer: &ModuleId,
    ) -> Result<ModuleId, ResolveError> {
        let _ = importer;
        self.resolve(reference)
    }
}

/// Which reference kinds a deployment accepts
///
/// Checked after parsing and before normalization, so disallowed references
/// fail fast with the reference as supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferencePolicy {
    /// Bare names, relative and absolute paths all accepted
    #[default]
    Lenient,

    /// Only canonical absolute identities accepted
    AbsoluteOnly,

    /// Only bare registered names accepted
    NamesOnly,
}

impl ReferencePolicy {
    /// Check a classified reference against this policy
    ///
    /// # Errors
    /// [`ResolveError::PathNotAbsolute`] under [`Self::AbsoluteOnly`],
    /// [`ResolveError::InvalidReferenceKind`] under [`Self::NamesOnly`].
    pub fn check(self, reference: &ModuleRef) -> Result<(), ResolveError> {
        match (self, reference.kind()) {
            (Self::Lenient, _)
            | (Self::AbsoluteOnly, RefKind::Absolute)
            | (Self::NamesOnly, RefKind::Bare) => Ok(()),
            (Self::AbsoluteOnly, RefKind::Bare | RefKind::Relative) => {
                Err(ResolveError::PathNotAbsolute {
                    reference: reference.raw().to_string(),
                })
            }
            (Self::NamesOnly, kind) => Err(ResolveError::InvalidReferenceKind {
                reference: reference.raw().to_string(),
                kind,
            }),
        }
    }
}
