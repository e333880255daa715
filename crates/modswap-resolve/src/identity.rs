//! Canonical module identities
//!
//! Provides [`ModuleId`], the canonical comparable identity every reference
//! resolves to, and [`canonicalize`] which assigns identities by lexical
//! normalization.

use crate::reference::ModuleRef;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Canonical module identity
///
/// Two references denote the same physical module iff their identities
/// compare equal, so `/app/./deps/../deps/dependency1` and
/// `/app/deps/dependency1` produce the same `ModuleId`.
///
/// Identities are assigned by [`canonicalize`] (or a
/// [`Resolver`](crate::Resolver) built on it) and never change afterwards.
/// Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    #[inline]
    pub(crate) fn from_canonical(canonical: String) -> Self {
        Self(canonical.into())
    }

    /// Canonical identity string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identity is a bare module name rather than a path
    #[inline]
    #[must_use]
    pub fn is_bare(&self) -> bool {
        !self.0.starts_with('/')
    }

    /// Directory portion of a path identity
    ///
    /// The directory relative references inside this module resolve against.
    /// Bare-name identities live at the root.
    #[must_use]
    pub fn directory(&self) -> &str {
        if self.is_bare() {
            return "/";
        }
        match self.0.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.0[..idx],
        }
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Assign a canonical identity to a classified reference
///
/// Bare names are already canonical. Paths are normalized lexically:
/// `.` segments drop, `..` segments pop (never past the root), repeated
/// separators collapse. Relative references are joined onto `base_dir`
/// first.
#[must_use]
pub fn canonicalize(reference: &ModuleRef, base_dir: &str) -> ModuleId {
    match reference {
        ModuleRef::Bare(name) => ModuleId::from_canonical(name.clone()),
        ModuleRef::Absolute(path) => ModuleId::from_canonical(normalize_path(path)),
        ModuleRef::Relative(path) => {
            let joined = format!("{}/{}", base_dir.trim_end_matches('/'), path);
            ModuleId::from_canonical(normalize_path(&joined))
        }
    }
}

fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut canonical = String::with_capacity(path.len());
    for segment in &segments {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        canonical.push('/');
    }
    canonical
}
