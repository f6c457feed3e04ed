use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;
use crate::normalizer::Normalizer;

/// Error reported for a request that carries no `ref`.
pub const MISSING_REF: &str = "missing ref field";

/// Result of one normalization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The canonical string.
    Canonical(String),
    /// The rejection, with its classification and description.
    Error {
        /// Error classification.
        kind: ErrorKind,
        /// Human-readable description.
        message: String,
    },
}

impl Outcome {
    /// Whether the call produced a canonical string.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Outcome::Canonical(_))
    }
}

/// Request envelope: `{"ref": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeRequest {
    /// Raw reference; `None` when the field is missing.
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

/// Response envelope: exactly one of `ref` and `error` is non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeResponse {
    /// Canonical reference on success.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Failure description otherwise.
    pub error: Option<String>,
}

impl NormalizeResponse {
    /// Successful response.
    pub fn canonical(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            error: None,
        }
    }

    /// Failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            reference: None,
            error: Some(message.into()),
        }
    }
}

impl From<Outcome> for NormalizeResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Canonical(reference) => Self::canonical(reference),
            Outcome::Error { message, .. } => Self::error(message),
        }
    }
}

/// Answers one request envelope.
pub fn handle(normalizer: &Normalizer, request: &NormalizeRequest) -> NormalizeResponse {
    match &request.reference {
        Some(reference) => normalizer.evaluate(reference).into(),
        None => NormalizeResponse::error(MISSING_REF),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ref_is_answered_not_normalized() {
        let response = handle(&Normalizer::default(), &NormalizeRequest::default());
        assert_eq!(response, NormalizeResponse::error(MISSING_REF));
    }

    #[test]
    fn outcome_maps_to_exactly_one_field() {
        let ok: NormalizeResponse = Outcome::Canonical("docker.io/library/ubuntu".into()).into();
        assert!(ok.reference.is_some() && ok.error.is_none());

        let err: NormalizeResponse = Outcome::Error {
            kind: ErrorKind::InvalidTag,
            message: "invalid tag '-x'".into(),
        }
        .into();
        assert!(err.reference.is_none() && err.error.is_some());
    }
}
