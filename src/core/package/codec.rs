//! Dotted namespace <-> nested directory path conversion.

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A dotted package name such as `com.acme.app`.
///
/// Always holds at least one segment and never an empty segment or a path
/// separator. Segments are not required to be valid identifiers: directory
/// names found on disk pass through unchanged (see [`is_identifier`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(Error::validation_invalid_argument(
                "namespace",
                "Namespace is empty",
                Some(input.to_string()),
            ));
        }

        if trimmed.contains(['/', '\\']) {
            return Err(Error::validation_invalid_argument(
                "namespace",
                "Namespace segments cannot contain path separators",
                Some(input.to_string()),
            ));
        }

        if trimmed.split('.').any(|segment| segment.is_empty()) {
            return Err(Error::validation_invalid_argument(
                "namespace",
                "Namespace contains an empty segment",
                Some(input.to_string()),
            ));
        }

        Ok(Namespace(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    pub fn len(&self) -> usize {
        self.segments().len()
    }

    /// Namespaces always have at least one segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The namespace made of the first `k` segments.
    pub fn prefix(&self, k: usize) -> Option<Namespace> {
        let segments = self.segments();
        if k == 0 || k > segments.len() {
            return None;
        }
        Some(Namespace(segments[..k].join(".")))
    }

    /// `self.suffix`, used to carry a subpackage across a move.
    pub fn join(&self, suffix: &Namespace) -> Namespace {
        Namespace(format!("{}.{}", self.0, suffix.0))
    }

    /// Segments that are not valid JVM identifiers.
    pub fn invalid_segments(&self) -> Vec<&str> {
        self.segments()
            .into_iter()
            .filter(|segment| !is_identifier(segment))
            .collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Namespace::parse(s)
    }
}

/// Java/Kotlin identifier check: a letter, `_` or `$`, followed by letters,
/// digits, `_` or `$`.
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// `com.acme.app` -> `com/acme/app`
pub fn to_path(namespace: &Namespace) -> PathBuf {
    namespace.segments().into_iter().collect()
}

/// `com/acme/app` -> `com.acme.app`
///
/// Only plain relative components are accepted; `..`, `.`, roots and
/// non-UTF-8 names are rejected.
pub fn to_namespace(path: &Path) -> Result<Namespace> {
    let mut segments = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or_else(|| {
                    Error::validation_invalid_argument(
                        "path",
                        "Path segment is not valid UTF-8",
                        Some(path.display().to_string()),
                    )
                })?;
                segments.push(name);
            }
            _ => {
                return Err(Error::validation_invalid_argument(
                    "path",
                    "Only relative paths made of plain directory names map to a namespace",
                    Some(path.display().to_string()),
                ));
            }
        }
    }

    Namespace::parse(&segments.join("."))
}

/// `to_path` rendered with `/` regardless of platform, for reports.
pub fn to_path_string(namespace: &Namespace) -> String {
    namespace.segments().join("/")
}
