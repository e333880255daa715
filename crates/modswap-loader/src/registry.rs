//! In-memory module registry
//!
//! [`ModuleRegistry`] is the concrete loader/cache/resolver: registered
//! module definitions, installed replacements, an instance cache, and the
//! import graph recording who imported whom. It implements both boundary
//! traits ([`Resolver`] and [`ModuleLoader`]) so one instance can serve a
//! whole test scope.

use crate::definition::{Linker, ModuleDefinition};
use crate::error::LoadError;
use crate::loader::ModuleLoader;
use crate::value::ModuleValue;
use modswap_resolve::{canonicalize, ModuleId, ModuleRef, ReferencePolicy, ResolveError, Resolver};
use parking_lot::Mutex;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reference kinds accepted by this registry
    pub policy: ReferencePolicy,

    /// Directory context-free relative references resolve against
    pub root: String,
}

impl RegistryConfig {
    /// Default configuration: lenient policy, `/` root
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the root directory
    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            policy: ReferencePolicy::default(),
            root: "/".to_string(),
        }
    }
}

/// Per-load execution context: the stack of modules currently executing,
/// used to detect import cycles.
#[derive(Default)]
pub(crate) struct LoadCtx {
    stack: RefCell<Vec<ModuleId>>,
}

/// Import graph over interned module indices
///
/// Edges point importer -> imported. Reverse reachability from the
/// overridden modules yields every cached instance a reset must invalidate.
#[derive(Debug, Default)]
struct ImportGraph {
    graph: DiGraphMap<u32, ()>,
    index: BTreeMap<ModuleId, u32>,
    nodes: Vec<ModuleId>,
}

impl ImportGraph {
    fn intern(&mut self, id: &ModuleId) -> u32 {
        if let Some(&n) = self.index.get(id) {
            return n;
        }
        let n = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(id.clone());
        self.index.insert(id.clone(), n);
        self.graph.add_node(n);
        n
    }

    fn set_imports(&mut self, importer: &ModuleId, imports: &[ModuleId]) {
        let from = self.intern(importer);
        self.clear_outgoing_node(from);
        for imported in imports {
            let to = self.intern(imported);
            if from != to {
                self.graph.add_edge(from, to, ());
            }
        }
    }

    fn clear_outgoing(&mut self, id: &ModuleId) {
        if let Some(&n) = self.index.get(id) {
            self.clear_outgoing_node(n);
        }
    }

    fn clear_outgoing_node(&mut self, n: u32) {
        let targets: Vec<u32> = self
            .graph
            .neighbors_directed(n, Direction::Outgoing)
            .collect();
        for t in targets {
            self.graph.remove_edge(n, t);
        }
    }

    /// The roots plus every module that transitively imported one of them
    fn affected_by<'a>(&self, roots: impl Iterator<Item = &'a ModuleId>) -> BTreeSet<ModuleId> {
        let mut affected = BTreeSet::new();
        let mut work = Vec::new();
        for root in roots {
            affected.insert(root.clone());
            if let Some(&n) = self.index.get(root) {
                work.push(n);
            }
        }

        let mut seen: BTreeSet<u32> = work.iter().copied().collect();
        while let Some(n) = work.pop() {
            for importer in self.graph.neighbors_directed(n, Direction::Incoming) {
                if seen.insert(importer) {
                    affected.insert(self.nodes[importer as usize].clone());
                    work.push(importer);
                }
            }
        }
        affected
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    definitions: BTreeMap<ModuleId, ModuleDefinition>,
    installed: BTreeMap<ModuleId, ModuleValue>,
    cache: BTreeMap<ModuleId, ModuleValue>,
    graph: ImportGraph,
}

/// In-memory module loader, cache and resolver
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl ModuleRegistry {
    /// Empty registry with the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with an explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Registry configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a module under `reference` with a re-executable body
    ///
    /// Re-registering an identity replaces its definition and drops any
    /// cached instance.
    ///
    /// # Errors
    /// Reference validation errors from the active policy.
    pub fn register<F>(&self, reference: &str, body: F) -> Result<ModuleId, ResolveError>
    where
        F: Fn(&Linker<'_>) -> Result<ModuleValue, LoadError> + Send + Sync + 'static,
    {
        self.register_definition(reference, ModuleDefinition::new(body))
    }

    /// Register a module exporting a constant value
    ///
    /// # Errors
    /// Reference validation errors from the active policy.
    pub fn register_value(
        &self,
        reference: &str,
        value: ModuleValue,
    ) -> Result<ModuleId, ResolveError> {
        self.register_definition(reference, ModuleDefinition::constant(value))
    }

    /// Register a prebuilt definition
    ///
    /// # Errors
    /// Reference validation errors from the active policy.
    pub fn register_definition(
        &self,
        reference: &str,
        definition: ModuleDefinition,
    ) -> Result<ModuleId, ResolveError> {
        let id = self.resolve_inner(reference, &self.config.root, false)?;
        let state = &mut *self.state.lock();
        state.definitions.insert(id.clone(), definition);
        state.cache.remove(&id);
        state.graph.clear_outgoing(&id);
        tracing::debug!("Registered module '{}'", id);
        Ok(id)
    }

    /// Identities of all registered modules, in order
    #[must_use]
    pub fn registered(&self) -> Vec<ModuleId> {
        self.state.lock().definitions.keys().cloned().collect()
    }

    pub(crate) fn resolve_for_import(
        &self,
        reference: &str,
        importer: &ModuleId,
    ) -> Result<ModuleId, ResolveError> {
        self.resolve_inner(reference, importer.directory(), true)
    }

    fn resolve_inner(
        &self,
        reference: &str,
        base_dir: &str,
        must_exist: bool,
    ) -> Result<ModuleId, ResolveError> {
        let parsed = ModuleRef::parse(reference)?;
        self.config.policy.check(&parsed)?;
        let id = canonicalize(&parsed, base_dir);
        if must_exist && !self.state.lock().definitions.contains_key(&id) {
            return Err(ResolveError::NotFound {
                reference: reference.to_string(),
            });
        }
        Ok(id)
    }

    pub(crate) fn load_with(&self, id: &ModuleId, ctx: &LoadCtx) -> Result<ModuleValue, LoadError> {
        let definition = {
            let state = self.state.lock();
            if let Some(replacement) = state.installed.get(id) {
                return Ok(replacement.clone());
            }
            if let Some(instance) = state.cache.get(id) {
                return Ok(instance.clone());
            }
            match state.definitions.get(id) {
                Some(def) => def.clone(),
                None => {
                    return Err(LoadError::UnknownModule { module: id.clone() });
                }
            }
        };

        if ctx.stack.borrow().contains(id) {
            return Err(LoadError::CircularImport { module: id.clone() });
        }

        // Execute the body outside the lock so imports can re-enter.
        ctx.stack.borrow_mut().push(id.clone());
        let linker = Linker::new(self, id.clone(), ctx);
        let result = definition.instantiate(&linker);
        ctx.stack.borrow_mut().pop();
        let exports = result?;
        let imports = linker.into_imports();

        let state = &mut *self.state.lock();
        state.cache.insert(id.clone(), exports.clone());
        state.graph.set_imports(id, &imports);
        Ok(exports)
    }
}

impl Resolver for ModuleRegistry {
    fn resolve(&self, reference: &str) -> Result<ModuleId, ResolveError> {
        self.resolve_inner(reference, &self.config.root, true)
    }

    fn resolve_from(&self, reference: &str, importer: &ModuleId) -> Result<ModuleId, ResolveError> {
        self.resolve_for_import(reference, importer)
    }
}

impl ModuleLoader for ModuleRegistry {
    fn install(&self, target: &ModuleId, replacement: ModuleValue) {
        let mut state = self.state.lock();
        state.installed.insert(target.clone(), replacement);
        tracing::debug!("Installed replacement for '{}'", target);
    }

    fn force_reload(&self, id: &ModuleId) -> Result<(), LoadError> {
        {
            let state = &mut *self.state.lock();
            if !state.definitions.contains_key(id) && !state.installed.contains_key(id) {
                return Err(LoadError::UnknownModule { module: id.clone() });
            }
            state.cache.remove(id);
            state.graph.clear_outgoing(id);
        }
        tracing::debug!("Force-reloading '{}'", id);
        self.load_with(id, &LoadCtx::default()).map(|_| ())
    }

    fn load(&self, id: &ModuleId) -> Result<ModuleValue, LoadError> {
        self.load_with(id, &LoadCtx::default())
    }

    fn reset_all(&self) {
        let state = &mut *self.state.lock();
        if state.installed.is_empty() {
            return;
        }
        let affected = state.graph.affected_by(state.installed.keys());
        for id in &affected {
            state.cache.remove(id);
            state.graph.clear_outgoing(id);
        }
        state.installed.clear();
        tracing::debug!("Reset all replacements ({} entries invalidated)", affected.len());
    }
}
