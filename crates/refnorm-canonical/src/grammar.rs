//! Terminals of the image reference grammar.
//!
//! ```text
//! reference       ::= name (":" tag)? ("@" digest)?
//! name            ::= (domain "/")? path
//! domain          ::= host (":" port)?
//! host            ::= label ("." label)* | "[" ipv6 "]"
//! path            ::= component ("/" component)*
//! component       ::= [a-z0-9]+ (separator [a-z0-9]+)*
//! separator       ::= [._] | "__" | "-"+
//! tag             ::= [A-Za-z0-9_] [A-Za-z0-9_.-]{0,127}
//! digest          ::= algorithm ":" hex
//! algorithm       ::= [a-z0-9]+ ([.+_-] [a-z0-9]+)*
//! hex             ::= [a-f0-9]+
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Host that is a domain even though it has neither `.` nor `:`.
pub const LOCALHOST: &str = "localhost";

/// Maximum tag length.
pub const TAG_MAX_LEN: usize = 128;

macro_rules! anchored {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        pub fn $name(value: &str) -> bool {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("invalid regex"))
                .is_match(value)
        }
    };
}

anchored!(
    is_path_component,
    "Lowercase alphanumerics joined by `.`, `_`, `__` or runs of `-`.",
    r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$"
);
anchored!(
    is_domain,
    "DNS-style labels or a bracketed IPv6 literal, with an optional numeric port.",
    r"^(?:(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])(?:\.(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]))*|\[[a-fA-F0-9:]+\])(?::[0-9]+)?$"
);
anchored!(
    is_tag,
    "Word character followed by up to 127 word characters, dots or dashes.",
    r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$"
);
anchored!(
    is_digest_algorithm,
    "Lowercase algorithm identifier such as `sha256` or `multihash+base58`.",
    r"^[a-z0-9]+(?:[.+_-][a-z0-9]+)*$"
);
anchored!(
    is_digest_hex,
    "Non-empty lowercase hexadecimal string.",
    r"^[a-f0-9]+$"
);
anchored!(
    is_identifier,
    "Bare 64-character content identifier.",
    r"^[a-f0-9]{64}$"
);

/// Decides whether the first name segment is a registry domain.
///
/// Character presence only: no resolution is attempted, so `my.app` counts
/// as a domain.
pub fn looks_like_domain(candidate: &str, known_hosts: &[String]) -> bool {
    candidate.contains(|c: char| c == '.' || c == ':')
        || candidate == LOCALHOST
        || known_hosts.iter().any(|host| host == candidate)
}
