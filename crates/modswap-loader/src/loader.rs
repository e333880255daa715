//! The module-loading collaborator boundary
//!
//! [`ModuleLoader`] is the one process-wide mutable resource in the system:
//! the set of currently installed replacements plus the cache of loaded
//! module instances. It is an explicit injectable service rather than
//! ambient global state, so each test scope can own its own instance.

use crate::error::LoadError;
use crate::value::ModuleValue;
use modswap_resolve::ModuleId;

/// Injectable module loader/cache service
///
/// Strictly sequential use is assumed; concurrent invocation from multiple
/// logical threads of control can interleave installs between callers.
pub trait ModuleLoader: Send + Sync {
    /// Install a replacement for `target`
    ///
    /// Subsequent loads of `target` observe the replacement instead of the
    /// real module until [`ModuleLoader::reset_all`] runs.
    fn install(&self, target: &ModuleId, replacement: ModuleValue);

    /// Invalidate and re-execute the module at `id`
    ///
    /// Re-linking the module's own imports against currently installed
    /// replacements.
    ///
    /// # Errors
    /// [`LoadError::UnknownModule`] for an unregistered identity, or
    /// whatever the module body fails with during re-execution.
    fn force_reload(&self, id: &ModuleId) -> Result<(), LoadError>;

    /// Current exports of the module at `id`, using the cache
    ///
    /// An installed replacement shadows both the cache and the real
    /// definition.
    ///
    /// # Errors
    /// Same as [`ModuleLoader::force_reload`].
    fn load(&self, id: &ModuleId) -> Result<ModuleValue, LoadError>;

    /// Remove every installed replacement
    ///
    /// Invalidates the cache entries the replacements affected (the
    /// replaced modules and every cached module that transitively imported
    /// one), so subsequent loads observe real, unmodified behavior.
    /// Idempotent.
    fn reset_all(&self);
}
