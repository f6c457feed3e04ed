use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::digest::DigestAlgorithms;
use crate::errors::ConfigError;
use crate::grammar;

/// Registry domain used when a reference names none.
pub const DEFAULT_DOMAIN: &str = "docker.io";
/// Namespace for single-segment names under the default domain.
pub const DEFAULT_NAMESPACE: &str = "library";
/// Historical alias of [`DEFAULT_DOMAIN`].
pub const LEGACY_DEFAULT_DOMAIN: &str = "index.docker.io";

/// Defaults injected into a [`crate::Normalizer`].
///
/// Deserializes from TOML; missing keys take their defaults. An empty
/// `default_namespace` disables namespace insertion, and a disabled namespace
/// serializes as `""` so printed configuration loads back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Domain substituted when a reference has none.
    pub default_domain: String,
    /// Namespace prepended to single-segment paths under the default domain.
    #[serde(serialize_with = "serialize_namespace")]
    pub default_namespace: Option<String>,
    /// Aliases rewritten to `default_domain`. Unset means `index.docker.io`
    /// when the default domain is `docker.io`, and no aliases otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_domains: Option<Vec<String>>,
    /// First segments treated as domains although they have no `.` or `:`.
    pub known_hosts: Vec<String>,
    /// Digest algorithm registry.
    pub digest: DigestConfig,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            default_domain: DEFAULT_DOMAIN.to_string(),
            default_namespace: Some(DEFAULT_NAMESPACE.to_string()),
            legacy_domains: None,
            known_hosts: Vec::new(),
            digest: DigestConfig::default(),
        }
    }
}

impl NormalizeConfig {
    /// Checks every configured value against the reference grammar.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !grammar::is_domain(&self.default_domain) {
            return Err(ConfigError::DefaultDomain(self.default_domain.clone()));
        }
        if !self.recognized(&self.default_domain) {
            return Err(ConfigError::UnrecognizedDomain(self.default_domain.clone()));
        }
        if let Some(namespace) = self.namespace() {
            if !namespace.split('/').all(grammar::is_path_component) {
                return Err(ConfigError::DefaultNamespace(namespace.to_string()));
            }
        }
        if let Some(bad) = self.known_hosts.iter().find(|h| !grammar::is_domain(h)) {
            return Err(ConfigError::KnownHost(bad.clone()));
        }
        let legacy = self.legacy_domains();
        if let Some(bad) = legacy.iter().find(|d| !grammar::is_domain(d)) {
            return Err(ConfigError::LegacyDomain(bad.to_string()));
        }
        if let Some(bad) = legacy.iter().find(|d| !self.recognized(d)) {
            return Err(ConfigError::UnrecognizedDomain(bad.to_string()));
        }
        self.digest.registry().map(|_| ())
    }

    /// The effective legacy aliases of the default domain.
    pub fn legacy_domains(&self) -> Vec<&str> {
        match &self.legacy_domains {
            Some(domains) => domains.iter().map(String::as_str).collect(),
            None if self.default_domain == DEFAULT_DOMAIN => vec![LEGACY_DEFAULT_DOMAIN],
            None => Vec::new(),
        }
    }

    // A domain the parser would read back as a path segment breaks idempotence.
    fn recognized(&self, domain: &str) -> bool {
        grammar::looks_like_domain(domain, &self.known_hosts)
    }

    /// The effective namespace; `None` when unset or empty.
    pub fn namespace(&self) -> Option<&str> {
        self.default_namespace
            .as_deref()
            .filter(|namespace| !namespace.is_empty())
    }
}

fn serialize_namespace<S: Serializer>(
    namespace: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(namespace.as_deref().unwrap_or(""))
}

/// Digest registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Accept algorithms missing from `algorithms` (hex of 32+ characters).
    pub allow_unregistered: bool,
    /// Algorithm name to required hex length.
    pub algorithms: BTreeMap<String, usize>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            allow_unregistered: true,
            algorithms: BTreeMap::from([
                ("sha256".to_string(), 64),
                ("sha384".to_string(), 96),
                ("sha512".to_string(), 128),
            ]),
        }
    }
}

impl DigestConfig {
    /// Builds the registry described by this section.
    pub fn registry(&self) -> Result<DigestAlgorithms, ConfigError> {
        let mut registry = DigestAlgorithms::new();
        for (name, &hex_len) in &self.algorithms {
            if !grammar::is_digest_algorithm(name) {
                return Err(ConfigError::DigestAlgorithm(name.clone()));
            }
            if hex_len == 0 {
                return Err(ConfigError::DigestLength(name.clone()));
            }
            registry = registry.register(name.clone(), hex_len);
        }
        if !self.allow_unregistered {
            registry = registry.reject_unregistered();
        }
        Ok(registry)
    }
}
