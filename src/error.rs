//! Errors that can happen while building a [`Client`](crate::Client) or aggregating engagement.
#![allow(missing_docs)]

use std::error::Error as _;

use thiserror::Error;

use crate::meta::Service;

pub use _inner::{ClientBuilderError, EngagementError};

/// Message of the gateway failure for an upstream that answered with an error status.
pub const STATUS_FAILURE_MESSAGE: &str = "Error consultando microservicios";

/// Message of the gateway failure for an upstream call that could not complete.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Fallo de agregación";

/// An upstream service answered, but with a non-success status.
#[derive(Debug, Error)]
#[error("the {service} service answered with `{status}`")]
pub struct UpstreamStatus {
    pub service: Service,
    pub status: reqwest::StatusCode,
}

/// The call to an upstream service did not complete: connection, DNS, timeout, or a
/// body that could not be read or decoded.
#[derive(Debug, Error)]
#[error("the call to the {service} service failed")]
pub struct UpstreamTransport {
    pub service: Service,
    #[source]
    pub failure: TransportFailure,
}

impl UpstreamTransport {
    pub(crate) fn new(service: Service, failure: impl Into<TransportFailure>) -> Self {
        Self {
            service,
            failure: failure.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// A base URL that the [`ClientBuilder`](crate::ClientBuilder) could not use.
#[derive(Debug, Error)]
#[error("invalid base url `{url}`: {reason}")]
pub struct InvalidBaseUrl {
    url: String,
    reason: String,
}

impl InvalidBaseUrl {
    pub(crate) fn new(url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl EngagementError {
    /// The upstream service the failure came from.
    #[must_use]
    pub fn service(&self) -> Service {
        match self {
            Self::Status(err) => err.service,
            Self::Transport(err) => err.service,
        }
    }

    /// Externally visible message. Both failure kinds are a gateway failure, only the
    /// wording differs.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Status(_) => STATUS_FAILURE_MESSAGE,
            Self::Transport(_) => TRANSPORT_FAILURE_MESSAGE,
        }
    }

    /// Diagnostic detail, only present when the call itself failed.
    ///
    /// Made of the whole source chain, e.g. `error sending request for url (..):
    /// client error (Connect): tcp connect error: Connection refused`.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let Self::Transport(err) = self else {
            return None;
        };

        let mut detail = err.failure.to_string();
        let mut source = err.failure.source();

        while let Some(cause) = source {
            let message = cause.to_string();
            // Some messages already end with their cause.
            if !detail.ends_with(&message) {
                detail.push_str(": ");
                detail.push_str(&message);
            }
            source = cause.source();
        }

        Some(detail)
    }
}

mod _inner {
    use error_set::error_set;

    error_set! {
        EngagementError := {
            Status(super::UpstreamStatus),
            Transport(super::UpstreamTransport),
        }

        ClientBuilderError := {
            #[display("failed to build the underlying http client")]
            BuildFailed,
            InvalidBaseUrl(super::InvalidBaseUrl),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn malformed(service: Service) -> EngagementError {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        UpstreamTransport::new(service, err).into()
    }

    #[test]
    fn status_failure_should_have_no_detail() {
        let err = EngagementError::from(UpstreamStatus {
            service: Service::Reactions,
            status: reqwest::StatusCode::NOT_FOUND,
        });

        assert_eq!(Service::Reactions, err.service());
        assert_eq!(STATUS_FAILURE_MESSAGE, err.message());
        assert_eq!(None, err.detail());
    }

    #[test]
    fn transport_failure_should_carry_detail() {
        let err = malformed(Service::Comments);

        assert_eq!(Service::Comments, err.service());
        assert_eq!(TRANSPORT_FAILURE_MESSAGE, err.message());
        assert_eq!(
            Some("malformed payload: expected value at line 1 column 1".to_owned()),
            err.detail()
        );
    }

    #[test]
    fn should_describe_failing_service() {
        let err = UpstreamStatus {
            service: Service::Comments,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };

        assert_eq!(
            "the comments service answered with `500 Internal Server Error`",
            err.to_string()
        );
    }
}
