//! Subject factory and the override-resolution algorithm
//!
//! A [`SubjectFactory`] is bound to one subject module and a baseline set of
//! default substitutions. Each [`materialize`](SubjectFactory::materialize)
//! call computes the effective substitution set from defaults plus per-call
//! overrides, installs it into the loader, force-reloads every affected
//! module and the subject, and returns the freshly linked subject exports.

use crate::error::SwapError;
use crate::substitution::{IntoSubstitutions, Substitution, SubstitutionSet};
use modswap_loader::{ModuleLoader, ModuleValue};
use modswap_resolve::{ModuleId, Resolver};
use std::sync::Arc;

/// Factory producing independently substituted subject instances
///
/// Created once per test scope. Carries no mutable state of its own; the
/// injected loader holds the process-wide override table and instance
/// cache, so ordering across factories matters unless
/// [`reset`](SubjectFactory::reset) runs between calls.
pub struct SubjectFactory {
    subject: ModuleId,
    defaults: SubstitutionSet,
    loader: Arc<dyn ModuleLoader>,
}

impl SubjectFactory {
    /// Bind a factory to a subject module and default substitutions
    ///
    /// The subject reference is validated and resolved exactly like a
    /// substitution target. Defaults are normalized: absent input is an
    /// empty set, a single substitution a singleton, a sequence is used
    /// as-is.
    ///
    /// # Errors
    /// Reference validation errors for the subject, or
    /// [`SwapError::DuplicateTarget`] if two defaults name one target.
    pub fn new(
        resolver: &dyn Resolver,
        loader: Arc<dyn ModuleLoader>,
        subject: &str,
        defaults: impl IntoSubstitutions,
    ) -> Result<Self, SwapError> {
        let subject = resolver.resolve(subject)?;
        let defaults = defaults.into_substitutions()?;
        Ok(Self {
            subject,
            defaults,
            loader,
        })
    }

    /// Identity of the subject module
    #[inline]
    #[must_use]
    pub fn subject(&self) -> &ModuleId {
        &self.subject
    }

    /// Default substitutions bound at construction
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &SubstitutionSet {
        &self.defaults
    }

    /// Materialize a fresh subject instance under the effective
    /// substitution set
    ///
    /// The effective set contains exactly one entry per distinct target in
    /// the union of defaults and overrides: defaults merged with their
    /// matching overrides (record defaults shallow-merge with record
    /// overrides, everything else swaps whole), plus every override with no
    /// matching default. Each affected module is installed and
    /// force-reloaded, then the subject itself is force-reloaded so its
    /// bindings re-resolve against the just-installed substitutions.
    ///
    /// Dependencies covered by neither defaults nor overrides keep their
    /// real behavior.
    ///
    /// # Errors
    /// [`SwapError::DuplicateTarget`] if the overrides name a target twice,
    /// or any loader error during reload.
    pub fn materialize(&self, overrides: impl IntoSubstitutions) -> Result<ModuleValue, SwapError> {
        let overrides = overrides.into_substitutions()?;
        tracing::debug!(
            "Materializing '{}' ({} default(s), {} override(s))",
            self.subject,
            self.defaults.len(),
            overrides.len()
        );

        for default in &self.defaults {
            let overriding = overrides.find(default.target());
            let effective = default
                .replacement()
                .effective(overriding.map(Substitution::replacement));
            tracing::debug!("Substituting '{}'", default.target());
            self.loader.install(default.target(), effective);
            self.loader.force_reload(default.target())?;
        }

        for overriding in &overrides {
            if self.defaults.contains_target(overriding.target()) {
                continue;
            }
            tracing::debug!("Substituting '{}' (override only)", overriding.target());
            self.loader
                .install(overriding.target(), overriding.replacement().to_module_value());
            self.loader.force_reload(overriding.target())?;
        }

        self.loader.force_reload(&self.subject)?;
        self.loader.load(&self.subject).map_err(SwapError::from)
    }

    /// Clear every substitution installed in the loader
    ///
    /// Global, not scoped to this factory; idempotent. The factory stays
    /// usable afterwards.
    pub fn reset(&self) {
        tracing::debug!("Resetting all installed substitutions");
        self.loader.reset_all();
    }
}

impl std::fmt::Debug for SubjectFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectFactory")
            .field("subject", &self.subject)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
