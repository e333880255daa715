//! Error types for the substitution core
//!
//! [`SwapError`] chains the boundary taxonomies (reference resolution,
//! module loading) with the one failure the core adds itself: duplicate
//! substitution targets. Everything surfaces synchronously; there is no
//! retry logic anywhere.

use modswap_loader::LoadError;
use modswap_resolve::{ModuleId, ResolveError};

/// Main substitution error type
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    /// Reference validation or resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The module loader failed during install/reload/load
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Two substitutions in one set name the same target
    #[error("duplicate substitution target: '{target}'")]
    DuplicateTarget {
        /// The target named more than once
        target: ModuleId,
    },
}
