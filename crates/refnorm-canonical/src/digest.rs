use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ReferenceError;
use crate::grammar;

/// Minimum hex length accepted for algorithms the registry does not know.
pub const UNREGISTERED_MIN_HEX_LEN: usize = 32;

/// Registry of digest algorithms and the hex length each one requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestAlgorithms {
    lengths: BTreeMap<String, usize>,
    allow_unregistered: bool,
}

impl Default for DigestAlgorithms {
    /// `sha256`, `sha384` and `sha512`; unknown algorithms accepted.
    fn default() -> Self {
        Self::new()
            .register("sha256", 64)
            .register("sha384", 96)
            .register("sha512", 128)
    }
}

impl DigestAlgorithms {
    /// Creates an empty registry that accepts any algorithm.
    pub fn new() -> Self {
        Self {
            lengths: BTreeMap::new(),
            allow_unregistered: true,
        }
    }

    /// Registers `name` with the exact hex length its digests must have.
    pub fn register(mut self, name: impl Into<String>, hex_len: usize) -> Self {
        self.lengths.insert(name.into(), hex_len);
        self
    }

    /// Rejects digests whose algorithm is not registered.
    pub fn reject_unregistered(mut self) -> Self {
        self.allow_unregistered = false;
        self
    }

    /// Required hex length for a registered algorithm.
    pub fn hex_len(&self, algorithm: &str) -> Option<usize> {
        self.lengths.get(algorithm).copied()
    }

    /// Whether unregistered algorithms are accepted.
    pub fn allows_unregistered(&self) -> bool {
        self.allow_unregistered
    }

    /// Checks a grammatically valid `algorithm:hex` pair against the registry.
    pub fn check(&self, algorithm: &str, hex: &str) -> Result<(), ReferenceError> {
        match self.hex_len(algorithm) {
            Some(expected) if expected != hex.len() => Err(ReferenceError::DigestLength {
                algorithm: algorithm.to_string(),
                expected,
                actual: hex.len(),
            }),
            Some(_) => Ok(()),
            None if !self.allow_unregistered => Err(ReferenceError::UnsupportedAlgorithm {
                algorithm: algorithm.to_string(),
            }),
            None if hex.len() < UNREGISTERED_MIN_HEX_LEN => Err(ReferenceError::DigestTooShort {
                algorithm: algorithm.to_string(),
                min: UNREGISTERED_MIN_HEX_LEN,
                actual: hex.len(),
            }),
            None => Ok(()),
        }
    }
}

/// Content digest pinning an exact image, encoded as `algorithm:hex`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest {
    algorithm: String,
    hex: String,
}

impl Digest {
    /// Parses `algorithm:hex` and checks it against `algorithms`.
    pub fn parse(value: &str, algorithms: &DigestAlgorithms) -> Result<Self, ReferenceError> {
        let invalid = || ReferenceError::InvalidDigest {
            value: value.to_string(),
        };
        let (algorithm, hex) = value.split_once(':').ok_or_else(invalid)?;
        if !grammar::is_digest_algorithm(algorithm) || !grammar::is_digest_hex(hex) {
            return Err(invalid());
        }
        algorithms.check(algorithm, hex)?;
        Ok(Self {
            algorithm: algorithm.to_string(),
            hex: hex.to_string(),
        })
    }

    /// Algorithm identifier, e.g. `sha256`.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Lowercase hex encoding of the digest bytes.
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl TryFrom<String> for Digest {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value, &DigestAlgorithms::default())
    }
}

impl From<Digest> for String {
    fn from(value: Digest) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SHA256_HEX: &str = "86e0e091d0da6bde2456dbb48306f3956bbeb2eae1b5b9a43045843f69fe4aaa";

    #[test]
    fn parses_registered_algorithm() {
        let digest = Digest::parse(&format!("sha256:{SHA256_HEX}"), &DigestAlgorithms::default())
            .unwrap();
        assert_eq!(digest.algorithm(), "sha256");
        assert_eq!(digest.hex(), SHA256_HEX);
        assert_eq!(digest.to_string(), format!("sha256:{SHA256_HEX}"));
    }

    #[test]
    fn rejects_missing_separator() {
        let err = Digest::parse("badalgo", &DigestAlgorithms::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDigest);
        assert!(matches!(err, ReferenceError::InvalidDigest { .. }));
    }

    #[test]
    fn rejects_uppercase_hex() {
        let upper = SHA256_HEX.to_uppercase();
        assert!(Digest::parse(&format!("sha256:{upper}"), &DigestAlgorithms::default()).is_err());
    }

    #[test]
    fn registered_length_is_exact() {
        let err = Digest::parse("sha256:abcd", &DigestAlgorithms::default()).unwrap_err();
        assert_eq!(
            err,
            ReferenceError::DigestLength {
                algorithm: "sha256".into(),
                expected: 64,
                actual: 4
            }
        );
    }

    #[test]
    fn unregistered_algorithms_need_minimum_length() {
        let registry = DigestAlgorithms::default();
        assert!(Digest::parse(&format!("blake3:{}", "a".repeat(32)), &registry).is_ok());
        assert!(matches!(
            Digest::parse("blake3:abcdef", &registry),
            Err(ReferenceError::DigestTooShort { min: 32, actual: 6, .. })
        ));
    }

    #[test]
    fn strict_registry_rejects_unknown_algorithms() {
        let registry = DigestAlgorithms::default().reject_unregistered();
        assert!(!registry.allows_unregistered());
        assert!(matches!(
            Digest::parse(&format!("blake3:{}", "a".repeat(64)), &registry),
            Err(ReferenceError::UnsupportedAlgorithm { .. })
        ));
    }

    #[test]
    fn custom_algorithm_registration() {
        let registry = DigestAlgorithms::new().register("blake3", 64).reject_unregistered();
        assert_eq!(registry.hex_len("blake3"), Some(64));
        assert!(Digest::parse(&format!("blake3:{}", "b".repeat(64)), &registry).is_ok());
        assert!(Digest::parse(&format!("sha256:{SHA256_HEX}"), &registry).is_err());
    }
}
