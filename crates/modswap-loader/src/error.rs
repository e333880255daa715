//! Error types for module loading

use modswap_resolve::{ModuleId, ResolveError};

/// Errors raised by the module loader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// No module registered under the identity
    #[error("module not found in registry: '{module}'")]
    UnknownModule {
        /// The identity with no registered module
        module: ModuleId,
    },

    /// A module transitively imported itself
    #[error("circular import detected at '{module}'")]
    CircularImport {
        /// The identity that closed the cycle
        module: ModuleId,
    },

    /// A non-function value was invoked
    #[error("binding is not callable")]
    NotCallable,

    /// A reference inside a module body failed to resolve
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A module body failed while executing
    #[error("module initialization failed: {0}")]
    Failed(String),
}

impl LoadError {
    /// Initialization failure with a reason, for use inside module bodies
    #[inline]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
