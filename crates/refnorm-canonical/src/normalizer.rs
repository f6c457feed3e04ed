use tracing::debug;

use crate::config::{NormalizeConfig, DEFAULT_DOMAIN, DEFAULT_NAMESPACE, LEGACY_DEFAULT_DOMAIN};
use crate::digest::DigestAlgorithms;
use crate::envelope::Outcome;
use crate::errors::{ConfigError, ReferenceError};
use crate::parser::{Parser, NAME_TOTAL_LENGTH_MAX};
use crate::reference::{Domain, Reference, RepositoryPath};

/// Resolves defaults and serializes references into canonical form.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizeConfig,
    default_domain: Domain,
    default_namespace: Option<RepositoryPath>,
    legacy_domains: Vec<Domain>,
    algorithms: DigestAlgorithms,
}

impl Default for Normalizer {
    /// `docker.io` with the `library` namespace.
    fn default() -> Self {
        Self {
            config: NormalizeConfig::default(),
            default_domain: Domain::new_unchecked(DEFAULT_DOMAIN),
            default_namespace: Some(RepositoryPath::new_unchecked(DEFAULT_NAMESPACE)),
            legacy_domains: vec![Domain::new_unchecked(LEGACY_DEFAULT_DOMAIN)],
            algorithms: DigestAlgorithms::default(),
        }
    }
}

impl Normalizer {
    /// Creates a normalizer from validated configuration.
    pub fn new(config: NormalizeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let algorithms = config.digest.registry()?;
        let default_domain = Domain::new_unchecked(config.default_domain.as_str());
        let default_namespace = config.namespace().map(RepositoryPath::new_unchecked);
        let legacy_domains = config
            .legacy_domains()
            .into_iter()
            .map(Domain::new_unchecked)
            .collect();
        Ok(Self {
            config,
            default_domain,
            default_namespace,
            legacy_domains,
            algorithms,
        })
    }

    /// Configuration this normalizer was built from.
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Parses `input`, rejecting names whose canonical form would exceed the
    /// total length limit.
    pub fn parse(&self, input: &str) -> Result<Reference, ReferenceError> {
        let reference = Parser::new(&self.config.known_hosts, &self.algorithms).parse(input)?;
        if self.normalize_reference(&reference).name().len() > NAME_TOTAL_LENGTH_MAX {
            return Err(ReferenceError::NameTooLong {
                max: NAME_TOTAL_LENGTH_MAX,
            });
        }
        Ok(reference)
    }

    /// Applies the default domain and namespace. The result always has a domain.
    pub fn normalize_reference(&self, reference: &Reference) -> Reference {
        let domain = match &reference.domain {
            Some(domain) if !self.legacy_domains.contains(domain) => domain.clone(),
            _ => self.default_domain.clone(),
        };
        let path = match &self.default_namespace {
            Some(namespace)
                if domain == self.default_domain && reference.path.segment_count() == 1 =>
            {
                reference.path.prefixed(namespace)
            }
            _ => reference.path.clone(),
        };
        Reference {
            domain: Some(domain),
            path,
            tag: reference.tag.clone(),
            digest: reference.digest.clone(),
        }
    }

    /// Canonical string for an already-parsed reference.
    pub fn normalize(&self, reference: &Reference) -> String {
        self.normalize_reference(reference).to_string()
    }

    /// Parses and normalizes in one step.
    pub fn canonicalize(&self, input: &str) -> Result<String, ReferenceError> {
        let reference = self.parse(input)?;
        Ok(self.normalize(&reference))
    }

    /// Parses and normalizes, folding failures into an [`Outcome`].
    pub fn evaluate(&self, input: &str) -> Outcome {
        match self.canonicalize(input) {
            Ok(canonical) => {
                debug!(input, canonical = %canonical, "normalized reference");
                Outcome::Canonical(canonical)
            }
            Err(err) => {
                debug!(input, kind = %err.kind(), error = %err, "rejected reference");
                Outcome::Error {
                    kind: err.kind(),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Short form for display: drops the default domain and, for
    /// `namespace/name` paths, the default namespace.
    ///
    /// `docker.io/library/redis:7` becomes `redis:7`; references on other
    /// registries keep their full canonical form.
    pub fn familiarize(&self, reference: &Reference) -> String {
        let mut familiar = self.normalize_reference(reference);
        if familiar.domain.as_ref() != Some(&self.default_domain) {
            return familiar.to_string();
        }
        familiar.domain = None;
        if let Some(namespace) = &self.default_namespace {
            if let Some(rest) = familiar.path.strip_prefix(namespace) {
                if rest.segment_count() == 1 {
                    familiar.path = rest;
                }
            }
        }
        familiar.to_string()
    }
}
