//! API client errors.

use serde::Deserialize;
use thiserror::Error;

use crate::session::StorageError;

/// Errors that can occur when talking to the order service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Service {
        /// HTTP status code
        status: u16,

        /// Message reported by the service
        message: String,
    },

    /// The service rejected the session; it has been cleared.
    #[error("session expired; sign in again")]
    SessionExpired,

    /// A success response could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The session could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Message reported by the service, if the service answered.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Debug, Deserialize)]
struct FieldError {
    msg: String,
}

/// Message for a failed response: the body's `detail` when present, else a
/// generic status line.
pub(crate) fn service_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| match body.detail {
            Detail::Message(message) => message,
            Detail::Fields(fields) => fields
                .into_iter()
                .map(|field| field.msg)
                .collect::<Vec<_>>()
                .join("; "),
        })
        .filter(|message| !message.trim().is_empty());

    detail.unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        assert_eq!(
            service_message(400, r#"{"detail":"Insufficient stock for Paracetamol"}"#),
            "Insufficient stock for Paracetamol"
        );
    }

    #[test]
    fn validation_details_are_joined() {
        let body = r#"{"detail":[{"loc":["body","customer_phone"],"msg":"field required"},{"loc":["body","items"],"msg":"ensure this value has at least 1 items"}]}"#;

        assert_eq!(
            service_message(422, body),
            "field required; ensure this value has at least 1 items"
        );
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        assert_eq!(
            service_message(502, "<html>Bad Gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(service_message(500, r#"{"detail":""}"#), "Request failed with status 500");
    }
}
