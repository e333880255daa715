//! Module definitions and the import linker
//!
//! A [`ModuleDefinition`] is the re-executable body of a registered module.
//! Each (re)load runs the body with a [`Linker`], through which the body
//! imports its dependencies; imports observe whatever replacements are
//! installed at that moment, which is what makes force-reload re-link a
//! module against fresh substitutions.

use crate::error::LoadError;
use crate::registry::{LoadCtx, ModuleRegistry};
use crate::value::ModuleValue;
use modswap_resolve::ModuleId;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

type DefinitionFn = dyn Fn(&Linker<'_>) -> Result<ModuleValue, LoadError> + Send + Sync;

/// Re-executable module body
#[derive(Clone)]
pub struct ModuleDefinition(Arc<DefinitionFn>);

impl ModuleDefinition {
    /// Definition from a body closure
    #[inline]
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Linker<'_>) -> Result<ModuleValue, LoadError> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    /// Definition that exports a constant value and imports nothing
    #[inline]
    #[must_use]
    pub fn constant(value: ModuleValue) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    pub(crate) fn instantiate(&self, linker: &Linker<'_>) -> Result<ModuleValue, LoadError> {
        (self.0)(linker)
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModuleDefinition(<body>)")
    }
}

/// Import interface handed to an executing module body
///
/// Records which modules the body imported, so the registry can maintain the
/// import graph for reset invalidation.
pub struct Linker<'a> {
    registry: &'a ModuleRegistry,
    importer: ModuleId,
    ctx: &'a LoadCtx,
    imports: RefCell<Vec<ModuleId>>,
}

impl<'a> Linker<'a> {
    pub(crate) fn new(registry: &'a ModuleRegistry, importer: ModuleId, ctx: &'a LoadCtx) -> Self {
        Self {
            registry,
            importer,
            ctx,
            imports: RefCell::new(Vec::new()),
        }
    }

    /// Resolve and load a dependency of the executing module
    ///
    /// Relative references resolve against the importing module's directory.
    /// An installed replacement for the target shadows its real definition.
    ///
    /// # Errors
    /// Resolution errors for the reference, [`LoadError::CircularImport`]
    /// when the import closes a cycle, or whatever the dependency's own body
    /// fails with.
    pub fn import(&self, reference: &str) -> Result<ModuleValue, LoadError> {
        let id = self.registry.resolve_for_import(reference, &self.importer)?;
        let exports = self.registry.load_with(&id, self.ctx)?;
        self.imports.borrow_mut().push(id);
        Ok(exports)
    }

    /// Identity of the module being executed
    #[inline]
    #[must_use]
    pub fn importer(&self) -> &ModuleId {
        &self.importer
    }

    pub(crate) fn into_imports(self) -> Vec<ModuleId> {
        self.imports.into_inner()
    }
}
