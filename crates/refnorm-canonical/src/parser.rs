use crate::digest::{Digest, DigestAlgorithms};
use crate::errors::ReferenceError;
use crate::grammar;
use crate::reference::{Domain, Reference, RepositoryPath, Tag};

/// Maximum length of the `domain/path` name.
pub const NAME_TOTAL_LENGTH_MAX: usize = 255;

/// Splits a reference string into its four fields.
///
/// Extraction runs right to left: the digest after the last `@`, then the tag
/// after the last `:` that follows the last `/`, then the domain/path split on
/// the first `/`. The first violation aborts the parse.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    known_hosts: &'a [String],
    algorithms: &'a DigestAlgorithms,
}

impl<'a> Parser<'a> {
    /// Creates a parser treating `known_hosts` as domains and checking digests
    /// against `algorithms`.
    pub fn new(known_hosts: &'a [String], algorithms: &'a DigestAlgorithms) -> Self {
        Self {
            known_hosts,
            algorithms,
        }
    }

    /// Parses `input` into a [`Reference`] without applying any defaults.
    pub fn parse(&self, input: &str) -> Result<Reference, ReferenceError> {
        if input.is_empty() {
            return Err(ReferenceError::EmptyName);
        }
        if grammar::is_identifier(input) {
            return Err(ReferenceError::NameIsIdentifier);
        }

        let (rest, digest) = match input.rsplit_once('@') {
            Some((rest, digest)) => (rest, Some(Digest::parse(digest, self.algorithms)?)),
            None => (input, None),
        };
        let (name, tag) = split_tag(rest)?;

        if name.is_empty() {
            return Err(ReferenceError::EmptyName);
        }
        if name.len() > NAME_TOTAL_LENGTH_MAX {
            return Err(ReferenceError::NameTooLong {
                max: NAME_TOTAL_LENGTH_MAX,
            });
        }

        let (domain, path) = self.split_domain(name)?;
        Ok(Reference {
            domain,
            path,
            tag,
            digest,
        })
    }

    fn split_domain(
        &self,
        name: &str,
    ) -> Result<(Option<Domain>, RepositoryPath), ReferenceError> {
        match name.split_once('/') {
            Some((first, rest)) if grammar::looks_like_domain(first, self.known_hosts) => {
                let domain = Domain::parse(first)?;
                Ok((Some(domain), RepositoryPath::parse(rest)?))
            }
            Some(_) => Ok((None, RepositoryPath::parse(name)?)),
            None if grammar::looks_like_domain(name, self.known_hosts) => {
                // A lone domain leaves nothing for the path.
                Domain::parse(name)?;
                Err(ReferenceError::EmptyName)
            }
            None => Ok((None, RepositoryPath::parse(name)?)),
        }
    }
}

fn split_tag(name: &str) -> Result<(&str, Option<Tag>), ReferenceError> {
    let last_segment = name.rfind('/').map_or(0, |slash| slash + 1);
    match name[last_segment..].rfind(':') {
        Some(colon) => {
            let colon = last_segment + colon;
            let tag = Tag::parse(&name[colon + 1..])?;
            Ok((&name[..colon], Some(tag)))
        }
        None => Ok((name, None)),
    }
}
