use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The composite identity of a versionable SpecIF entity.
///
/// A key is an `id` plus an optional `revision`. A key without a revision is
/// a distinct value meaning "latest or unspecified revision"; stores resolve
/// it to a concrete snapshot on lookup.
///
/// Keys deserialize from either a bare id string or a `{ "id", "revision" }`
/// object. An empty revision string is treated as no revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "KeyRepr")]
pub struct Key {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    revision: Option<String>,
}

impl Key {
    /// Create a key for a specific revision of an entity.
    ///
    /// An empty revision produces an unrevisioned key.
    #[must_use]
    pub fn new(id: impl Into<String>, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        Self {
            id: id.into(),
            revision: (!revision.is_empty()).then_some(revision),
        }
    }

    /// Create a key that does not name a revision.
    #[must_use]
    pub fn unrevisioned(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revision: None,
        }
    }

    /// Create a key from an id and an optional revision.
    #[must_use]
    pub fn from_parts(id: impl Into<String>, revision: Option<&str>) -> Self {
        let id = id.into();
        match revision {
            Some(revision) => Self::new(id, revision),
            None => Self::unrevisioned(id),
        }
    }

    /// The entity identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The revision, if the key names one.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Whether the key names a concrete revision.
    #[must_use]
    pub const fn is_revisioned(&self) -> bool {
        self.revision.is_some()
    }

    /// Whether this key, used as a reference, points at `target`.
    ///
    /// The ids must be equal. An unrevisioned reference matches every
    /// revision; a revisioned one matches only itself.
    #[must_use]
    pub fn matches(&self, target: &Self) -> bool {
        self.id == target.id
            && self
                .revision
                .as_ref()
                .is_none_or(|revision| target.revision.as_ref() == Some(revision))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(revision) => write!(f, "{}@{revision}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Error returned when a key cannot be parsed from text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid key '{0}': expected 'ID' or 'ID@REVISION' with a non-empty ID")]
pub struct KeyParseError(String);

impl FromStr for Key {
    type Err = KeyParseError;

    /// Parses `ID` or `ID@REVISION`.
    ///
    /// The revision is everything after the last `@`, so ids may themselves
    /// contain `@`. A trailing `@` yields an unrevisioned key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, revision) = s.rsplit_once('@').unwrap_or((s, ""));

        if id.is_empty() {
            return Err(KeyParseError(s.to_string()));
        }

        Ok(Self::new(id, revision))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Id(String),
    Full {
        id: String,
        #[serde(default)]
        revision: Option<String>,
    },
}

impl From<KeyRepr> for Key {
    fn from(repr: KeyRepr) -> Self {
        match repr {
            KeyRepr::Id(id) => Self::unrevisioned(id),
            KeyRepr::Full { id, revision } => Self::new(id, revision.unwrap_or_default()),
        }
    }
}
