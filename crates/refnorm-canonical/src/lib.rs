//! Container image reference parsing and canonical normalization.
//!
//! A raw reference such as `ubuntu`, `myregistry.io:5000/team/app:1.2` or
//! `alpine@sha256:...` is split into domain, path, tag and digest by the
//! [`Parser`], then the [`Normalizer`] fills in the default domain and
//! namespace and serializes the canonical form:
//!
//! ```
//! let reference = refnorm_canonical::parse("alpine:3.18").unwrap();
//! assert_eq!(refnorm_canonical::normalize(&reference), "docker.io/library/alpine:3.18");
//! ```
//!
//! Normalization is purely syntactic. No registry is contacted and digests
//! are never interpreted.
//!
#![deny(missing_docs)]

/// Defaults injected into the normalizer.
pub mod config;
/// Digest parsing and the algorithm registry.
pub mod digest;
/// Request/response envelope and call outcome.
pub mod envelope;
/// Error taxonomy.
pub mod errors;
/// Terminals of the reference grammar.
pub mod grammar;
/// Default substitution and canonical serialization.
pub mod normalizer;
/// Field extraction from raw reference strings.
pub mod parser;
/// Reference and component types.
pub mod reference;

pub use config::{DigestConfig, NormalizeConfig};
pub use digest::{Digest, DigestAlgorithms};
pub use envelope::{handle, NormalizeRequest, NormalizeResponse, Outcome};
pub use errors::{ConfigError, ErrorKind, ReferenceError};
pub use normalizer::Normalizer;
pub use parser::Parser;
pub use reference::{Domain, Reference, RepositoryPath, Tag};

/// Parses `input` under the default configuration.
pub fn parse(input: &str) -> Result<Reference, ReferenceError> {
    Normalizer::default().parse(input)
}

/// Canonical string for `reference` under the default configuration.
pub fn normalize(reference: &Reference) -> String {
    Normalizer::default().normalize(reference)
}
