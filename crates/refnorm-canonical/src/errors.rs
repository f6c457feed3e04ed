use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a rejected reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Structural violation: empty input, empty path, illegal characters.
    InvalidFormat,
    /// The domain candidate fails the domain grammar.
    InvalidDomain,
    /// The tag fails its character class or length constraint.
    InvalidTag,
    /// The digest fails the `algorithm:hex` grammar or the algorithm registry.
    InvalidDigest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::InvalidDomain => "InvalidDomain",
            ErrorKind::InvalidTag => "InvalidTag",
            ErrorKind::InvalidDigest => "InvalidDigest",
        };
        f.write_str(name)
    }
}

/// Errors raised while parsing a reference string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// No repository name was given.
    #[error("invalid reference format: repository name must have at least one component")]
    EmptyName,
    /// A path component contains uppercase characters.
    #[error("invalid reference format: repository name must be lowercase")]
    NameContainsUppercase,
    /// The `domain/path` name exceeds the total length limit.
    #[error("invalid reference format: repository name must not be more than {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The whole input is a bare 64-character hex identifier.
    #[error("invalid reference format: cannot specify 64-byte hexadecimal strings as a repository name")]
    NameIsIdentifier,
    /// Two slashes are adjacent, or the path starts or ends with a slash.
    #[error("invalid reference format: path contains an empty component")]
    EmptyPathComponent,
    /// A path component does not match the component grammar.
    #[error("invalid reference format: path component '{component}' is not allowed")]
    InvalidPathComponent {
        /// Offending component.
        component: String,
    },
    /// The domain candidate does not match the domain grammar.
    #[error("invalid domain '{value}'")]
    InvalidDomain {
        /// Offending domain.
        value: String,
    },
    /// The tag does not match the tag grammar.
    #[error("invalid tag '{value}'")]
    InvalidTag {
        /// Offending tag.
        value: String,
    },
    /// The tag is longer than allowed.
    #[error("invalid tag: length {len} exceeds maximum {max}")]
    TagTooLong {
        /// Actual tag length.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// The digest is not `algorithm:hex`.
    #[error("invalid digest '{value}': expected algorithm:hex")]
    InvalidDigest {
        /// Offending digest.
        value: String,
    },
    /// A registered algorithm received a hex part of the wrong length.
    #[error("invalid digest: {algorithm} requires {expected} hex characters, got {actual}")]
    DigestLength {
        /// Digest algorithm.
        algorithm: String,
        /// Length required by the registry.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// An unregistered algorithm received a hex part below the minimum length.
    #[error("invalid digest: {algorithm} hex must have at least {min} characters, got {actual}")]
    DigestTooShort {
        /// Digest algorithm.
        algorithm: String,
        /// Minimum length for unregistered algorithms.
        min: usize,
        /// Length supplied.
        actual: usize,
    },
    /// The algorithm is not registered and the registry rejects unknown algorithms.
    #[error("invalid digest: unsupported algorithm '{algorithm}'")]
    UnsupportedAlgorithm {
        /// Digest algorithm.
        algorithm: String,
    },
}

impl ReferenceError {
    /// Maps the detailed error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReferenceError::EmptyName
            | ReferenceError::NameContainsUppercase
            | ReferenceError::NameTooLong { .. }
            | ReferenceError::NameIsIdentifier
            | ReferenceError::EmptyPathComponent
            | ReferenceError::InvalidPathComponent { .. } => ErrorKind::InvalidFormat,
            ReferenceError::InvalidDomain { .. } => ErrorKind::InvalidDomain,
            ReferenceError::InvalidTag { .. } | ReferenceError::TagTooLong { .. } => {
                ErrorKind::InvalidTag
            }
            ReferenceError::InvalidDigest { .. }
            | ReferenceError::DigestLength { .. }
            | ReferenceError::DigestTooShort { .. }
            | ReferenceError::UnsupportedAlgorithm { .. } => ErrorKind::InvalidDigest,
        }
    }
}

/// Errors raised when a [`crate::NormalizeConfig`] cannot back a normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The default domain does not match the domain grammar.
    #[error("default_domain '{0}' is not a valid domain")]
    DefaultDomain(String),
    /// The default namespace does not match the path grammar.
    #[error("default_namespace '{0}' is not a valid repository path")]
    DefaultNamespace(String),
    /// A domain the parser would not recognize in first position.
    #[error("'{0}' has no '.' or ':' and is not localhost; list it in known_hosts")]
    UnrecognizedDomain(String),
    /// A legacy domain alias does not match the domain grammar.
    #[error("legacy domain '{0}' is not a valid domain")]
    LegacyDomain(String),
    /// A well-known host does not match the domain grammar.
    #[error("known host '{0}' is not a valid domain")]
    KnownHost(String),
    /// A registered digest algorithm name does not match the algorithm grammar.
    #[error("digest algorithm '{0}' is not a valid algorithm identifier")]
    DigestAlgorithm(String),
    /// A registered digest algorithm requires zero hex characters.
    #[error("digest algorithm '{0}' must require at least one hex character")]
    DigestLength(String),
}
