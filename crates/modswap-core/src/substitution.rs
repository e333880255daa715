//! Substitutions and replacement merging
//!
//! A [`Substitution`] pairs a canonical target identity with a
//! [`Replacement`]. The replacement carries a merge tag chosen at
//! construction time: a `Record` replacement participates in shallow
//! per-binding merging, a `Value` replacement is always swapped whole.
//! Dispatching on the tag instead of inspecting value shape is what keeps
//! sequences, callables and opaque values out of the merge path.

use crate::error::SwapError;
use modswap_loader::{BindingMap, ModuleValue};
use modswap_resolve::{ModuleId, ResolveError, Resolver};

/// Replacement behavior for a substitution target
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Whole-value replacement, never merged
    Value(ModuleValue),

    /// Structured record, shallow-merged with record overrides
    Record(BindingMap),
}

impl Replacement {
    /// Whole-value replacement
    #[inline]
    pub fn value(value: impl Into<ModuleValue>) -> Self {
        Self::Value(value.into())
    }

    /// Plain-data whole-value replacement
    #[inline]
    pub fn data(value: impl Into<serde_json::Value>) -> Self {
        Self::Value(ModuleValue::data(value))
    }

    /// Callable whole-value replacement
    #[inline]
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[ModuleValue]) -> ModuleValue + Send + Sync + 'static,
    {
        Self::Value(ModuleValue::function(f))
    }

    /// Mergeable structured-record replacement
    #[inline]
    #[must_use]
    pub fn record(bindings: BindingMap) -> Self {
        Self::Record(bindings)
    }

    /// The module value this replacement installs on its own
    #[must_use]
    pub fn to_module_value(&self) -> ModuleValue {
        match self {
            Self::Value(value) => value.clone(),
            Self::Record(bindings) => ModuleValue::Record(bindings.clone()),
        }
    }

    /// Effective replacement for a default (`self`) under an optional
    /// override
    ///
    /// - record default + record override: shallow one-level merge, override
    ///   bindings win, default-only bindings preserved
    /// - any other combination with an override present: the override wins
    ///   whole-value
    /// - no override: the default, whole-value
    #[must_use]
    pub fn effective(&self, overriding: Option<&Replacement>) -> ModuleValue {
        match (self, overriding) {
            (Self::Record(defaults), Some(Self::Record(overrides))) => {
                ModuleValue::Record(defaults.merged_with(overrides))
            }
            (_, Some(replacement)) => replacement.to_module_value(),
            (default, None) => default.to_module_value(),
        }
    }
}

/// An immutable pairing of target module identity and replacement value
///
/// The target identity is assigned at construction through the injected
/// resolver and never changes; a substitution with an invalid reference is
/// never constructible.
#[derive(Debug, Clone)]
pub struct Substitution {
    target: ModuleId,
    replacement: Replacement,
}

impl Substitution {
    /// Construct a substitution for `reference`
    ///
    /// # Errors
    /// Any [`ResolveError`]: missing reference, a kind disallowed by the
    /// resolver's policy, or an unresolvable target.
    pub fn new(
        resolver: &dyn Resolver,
        reference: &str,
        replacement: Replacement,
    ) -> Result<Self, ResolveError> {
        let target = resolver.resolve(reference)?;
        Ok(Self {
            target,
            replacement,
        })
    }

    /// Target module identity
    #[inline]
    #[must_use]
    pub fn target(&self) -> &ModuleId {
        &self.target
    }

    /// Replacement behavior
    #[inline]
    #[must_use]
    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }
}

/// Ordered substitution set, at most one entry per target
///
/// Construction rejects duplicate targets with
/// [`SwapError::DuplicateTarget`], so by the time a merge loop runs the
/// at-most-one-match invariant already holds and no further validation is
/// needed.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionSet {
    entries: Vec<Substitution>,
}

impl SubstitutionSet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validated set from a sequence of substitutions
    ///
    /// # Errors
    /// [`SwapError::DuplicateTarget`] if two substitutions name the same
    /// target.
    pub fn new(substitutions: impl IntoIterator<Item = Substitution>) -> Result<Self, SwapError> {
        let mut entries: Vec<Substitution> = Vec::new();
        for substitution in substitutions {
            if entries.iter().any(|s| s.target() == substitution.target()) {
                return Err(SwapError::DuplicateTarget {
                    target: substitution.target().clone(),
                });
            }
            entries.push(substitution);
        }
        Ok(Self { entries })
    }

    /// Substitution for `target`, if the set contains one
    #[inline]
    #[must_use]
    pub fn find(&self, target: &ModuleId) -> Option<&Substitution> {
        self.entries.iter().find(|s| s.target() == target)
    }

    /// Whether the set contains a substitution for `target`
    #[inline]
    #[must_use]
    pub fn contains_target(&self, target: &ModuleId) -> bool {
        self.find(target).is_some()
    }

    /// Number of substitutions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate substitutions in input order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Substitution> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a SubstitutionSet {
    type Item = &'a Substitution;
    type IntoIter = std::slice::Iter<'a, Substitution>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Input normalization for substitution arguments
///
/// Absent input is an empty set, a single substitution a singleton, a
/// sequence is validated as-is.
pub trait IntoSubstitutions {
    /// Normalize into a validated set
    ///
    /// # Errors
    /// [`SwapError::DuplicateTarget`] if the input names a target twice.
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError>;
}

impl IntoSubstitutions for () {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        Ok(SubstitutionSet::empty())
    }
}

impl IntoSubstitutions for Substitution {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        Ok(SubstitutionSet {
            entries: vec![self],
        })
    }
}

impl IntoSubstitutions for Option<Substitution> {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        Ok(SubstitutionSet {
            entries: self.into_iter().collect(),
        })
    }
}

impl IntoSubstitutions for Vec<Substitution> {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        SubstitutionSet::new(self)
    }
}

impl<const N: usize> IntoSubstitutions for [Substitution; N] {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        SubstitutionSet::new(self)
    }
}

impl IntoSubstitutions for &[Substitution] {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        SubstitutionSet::new(self.iter().cloned())
    }
}

impl IntoSubstitutions for SubstitutionSet {
    fn into_substitutions(self) -> Result<SubstitutionSet, SwapError> {
        Ok(self)
    }
}
