//! Raw module references and their classification
//!
//! Provides [`ModuleRef`] for validating and classifying the reference
//! strings callers hand to constructors before resolution.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A classified module reference
///
/// References come in three kinds, matching how a module may be named at a
/// call site:
/// - `Bare`: a registered module name (`"config"`)
/// - `Relative`: a path relative to the referencing context (`"./dep"`)
/// - `Absolute`: a rooted path (`"/app/deps/dependency1"`)
///
/// Parsing rejects empty references; whether a kind is acceptable is decided
/// separately by the active [`ReferencePolicy`](crate::ReferencePolicy).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleRef {
    /// Bare module name
    Bare(String),

    /// Relative path (`./` or `../` prefixed)
    Relative(String),

    /// Absolute path (rooted at `/`)
    Absolute(String),
}

/// Reference kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    /// Bare module name
    Bare,

    /// Relative path
    Relative,

    /// Absolute path
    Absolute,
}

impl ModuleRef {
    /// Parse and classify a raw reference string
    ///
    /// # Errors
    /// Returns [`ResolveError::MissingReference`] if the reference is empty
    /// or whitespace-only.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ResolveError::MissingReference);
        }

        if raw.starts_with('/') {
            Ok(Self::Absolute(raw.to_string()))
        } else if raw == "." || raw == ".." || raw.starts_with("./") || raw.starts_with("../") {
            Ok(Self::Relative(raw.to_string()))
        } else {
            Ok(Self::Bare(raw.to_string()))
        }
    }

    /// Kind of this reference
    #[inline]
    #[must_use]
    pub fn kind(&self) -> RefKind {
        match self {
            Self::Bare(_) => RefKind::Bare,
            Self::Relative(_) => RefKind::Relative,
            Self::Absolute(_) => RefKind::Absolute,
        }
    }

    /// The raw reference string as supplied
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Bare(s) | Self::Relative(s) | Self::Absolute(s) => s,
        }
    }
}

impl Display for ModuleRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

impl FromStr for ModuleRef {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for RefKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bare => "bare-name",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        };
        write!(f, "{label}")
    }
}
