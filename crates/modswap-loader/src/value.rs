//! The module value universe
//!
//! Provides [`ModuleValue`], the shape of everything a module can export and
//! everything a substitution can install: plain data, keyed records of named
//! bindings, callables, and opaque host values.

use crate::error::LoadError;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callable binding signature
pub type NativeFn = Arc<dyn Fn(&[ModuleValue]) -> ModuleValue + Send + Sync>;

/// A module export or replacement value
///
/// Equality is structural for `Data` and `Record`, pointer identity for
/// `Function` and `Opaque`. A JSON object inside `Data` is plain data, not a
/// record: whether a value participates in record merging is decided by the
/// replacement tag at substitution construction, never by inspecting shape.
#[derive(Clone)]
pub enum ModuleValue {
    /// Plain data: primitives, sequences, JSON trees
    Data(serde_json::Value),

    /// Keyed record of named bindings
    Record(BindingMap),

    /// Callable binding
    Function(NativeFn),

    /// Opaque host value (constructible types and the like)
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl ModuleValue {
    /// Null data value
    #[inline]
    #[must_use]
    pub fn null() -> Self {
        Self::Data(serde_json::Value::Null)
    }

    /// Plain data value
    #[inline]
    pub fn data(value: impl Into<serde_json::Value>) -> Self {
        Self::Data(value.into())
    }

    /// Record of named bindings
    #[inline]
    #[must_use]
    pub fn record(bindings: BindingMap) -> Self {
        Self::Record(bindings)
    }

    /// Callable value
    #[inline]
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[ModuleValue]) -> ModuleValue + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Opaque host value
    #[inline]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Borrow the underlying data, if this is `Data`
    #[inline]
    #[must_use]
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the bindings, if this is `Record`
    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&BindingMap> {
        match self {
            Self::Record(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a named binding, if this is `Record`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleValue> {
        self.as_record().and_then(|m| m.get(name))
    }

    /// Invoke the value as a function
    ///
    /// # Errors
    /// [`LoadError::NotCallable`] if the value is not a `Function`.
    pub fn call(&self, args: &[ModuleValue]) -> Result<ModuleValue, LoadError> {
        match self {
            Self::Function(f) => Ok(f(args)),
            _ => Err(LoadError::NotCallable),
        }
    }

    /// Downcast an opaque value to a concrete type
    #[must_use]
    pub fn downcast_opaque<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Opaque(any) => Arc::clone(any).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl PartialEq for ModuleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ModuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(v) => f.debug_tuple("Data").field(v).finish(),
            Self::Record(m) => f.debug_tuple("Record").field(m).finish(),
            Self::Function(_) => f.write_str("Function(<native>)"),
            Self::Opaque(_) => f.write_str("Opaque(<any>)"),
        }
    }
}

impl From<serde_json::Value> for ModuleValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Data(value)
    }
}

impl From<BindingMap> for ModuleValue {
    fn from(bindings: BindingMap) -> Self {
        Self::Record(bindings)
    }
}

/// Ordered map of named bindings
///
/// The record shape shallow merging operates over. Iteration order is the
/// binding-name order, so merges are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingMap(BTreeMap<String, ModuleValue>);

impl BindingMap {
    /// Empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: ModuleValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Insert a binding, returning the previous value for the name
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: ModuleValue) -> Option<ModuleValue> {
        self.0.insert(name.into(), value)
    }

    /// Look up a binding by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleValue> {
        self.0.get(name)
    }

    /// Whether a binding exists for the name
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of bindings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no bindings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate bindings in name order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Binding names in order
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Shallow one-level merge: `overrides` keys win, keys present only in
    /// `self` are preserved. Nested records are replaced whole, not merged.
    #[must_use]
    pub fn merged_with(&self, overrides: &BindingMap) -> BindingMap {
        let mut merged = self.0.clone();
        for (name, value) in &overrides.0 {
            merged.insert(name.clone(), value.clone());
        }
        Self(merged)
    }
}

impl FromIterator<(String, ModuleValue)> for BindingMap {
    fn from_iter<I: IntoIterator<Item = (String, ModuleValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
