use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::Digest;
use crate::errors::ReferenceError;
use crate::grammar;

macro_rules! newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wraps a value the caller has already validated.
            #[allow(dead_code)]
            pub(crate) fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrows the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ReferenceError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    Domain,
    "Registry host with optional port, e.g. `myregistry.io:5000` or `[::1]`."
);
newtype!(
    Tag,
    "Mutable version label (`[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}`)."
);
newtype!(
    RepositoryPath,
    "Non-empty `/`-joined sequence of lowercase path components."
);

impl Domain {
    /// Parses a domain, port included.
    pub fn parse(value: &str) -> Result<Self, ReferenceError> {
        if !grammar::is_domain(value) {
            return Err(ReferenceError::InvalidDomain {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }
}

impl Tag {
    /// Parses a tag, enforcing the length bound before the character class.
    pub fn parse(value: &str) -> Result<Self, ReferenceError> {
        if value.len() > grammar::TAG_MAX_LEN {
            return Err(ReferenceError::TagTooLong {
                len: value.len(),
                max: grammar::TAG_MAX_LEN,
            });
        }
        if !grammar::is_tag(value) {
            return Err(ReferenceError::InvalidTag {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }
}

impl RepositoryPath {
    /// Parses a path, validating every component.
    pub fn parse(value: &str) -> Result<Self, ReferenceError> {
        if value.is_empty() {
            return Err(ReferenceError::EmptyName);
        }
        for component in value.split('/') {
            if component.is_empty() {
                return Err(ReferenceError::EmptyPathComponent);
            }
            if !grammar::is_path_component(component) {
                if component.chars().any(|c| c.is_ascii_uppercase()) {
                    return Err(ReferenceError::NameContainsUppercase);
                }
                return Err(ReferenceError::InvalidPathComponent {
                    component: component.to_string(),
                });
            }
        }
        Ok(Self(value.to_string()))
    }

    /// Path components in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Number of path components.
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// `prefix/self`.
    pub(crate) fn prefixed(&self, prefix: &RepositoryPath) -> Self {
        Self(format!("{}/{}", prefix.0, self.0))
    }

    /// The path with `prefix/` removed, if it starts with that prefix.
    pub(crate) fn strip_prefix(&self, prefix: &RepositoryPath) -> Option<Self> {
        self.0
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map(Self::new_unchecked)
    }
}

/// Parsed image reference.
///
/// `Display` emits `domain/path`, then `:tag`, then `@algorithm:hex`, leaving
/// out whichever parts are absent. The canonical form is the `Display` of a
/// normalized reference, which always carries a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    /// Registry domain; `None` until normalization substitutes the default.
    pub domain: Option<Domain>,
    /// Repository path within the domain.
    pub path: RepositoryPath,
    /// Optional tag.
    pub tag: Option<Tag>,
    /// Optional digest; may coexist with a tag.
    pub digest: Option<Digest>,
}

impl Reference {
    /// `domain/path`, or just `path` when no domain is set.
    pub fn name(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}/{}", domain, self.path),
            None => self.path.to_string(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(domain) = &self.domain {
            write!(f, "{}/", domain)?;
        }
        write!(f, "{}", self.path)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Reference {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        crate::parse(&value)
    }
}

impl From<Reference> for String {
    fn from(value: Reference) -> Self {
        value.to_string()
    }
}
