/*
 * Responsibility
 * - per-request rejection reasons of the gate (GateError)
 * - status mapping: broken credential -> 401, missing group membership -> 403
 * - IntoResponse (plain-text body, one response per rejection)
 */
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Why a request was not forwarded.
///
/// `Display` yields the exact message written to the response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    // --- authentication (401) ---
    #[error("Unauthorized: missing bearer token")]
    MissingBearer,
    #[error("Unauthorized: malformed token")]
    MalformedToken,
    #[error("Unauthorized: invalid token encoding")]
    InvalidEncoding,
    #[error("Unauthorized: invalid token payload")]
    InvalidPayload,

    // --- authorization (403) ---
    #[error("Forbidden: no {claim:?} claim in token")]
    MissingClaim { claim: String },
    #[error("Forbidden: {claim:?} claim malformed")]
    MalformedClaim { claim: String },
    #[error("Forbidden: none of the required groups found")]
    NoMatchingGroup,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        if self.is_authentication() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::FORBIDDEN
        }
    }

    /// The credential itself is unusable (as opposed to lacking membership).
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            GateError::MissingBearer
                | GateError::MalformedToken
                | GateError::InvalidEncoding
                | GateError::InvalidPayload
        )
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = format!("{self}\n");

        (
            status,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_unauthorized() {
        for err in [
            GateError::MissingBearer,
            GateError::MalformedToken,
            GateError::InvalidEncoding,
            GateError::InvalidPayload,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED, "{err}");
        }
    }

    #[test]
    fn membership_failures_are_forbidden() {
        for err in [
            GateError::MissingClaim {
                claim: "groups".into(),
            },
            GateError::MalformedClaim {
                claim: "groups".into(),
            },
            GateError::NoMatchingGroup,
        ] {
            assert_eq!(err.status(), StatusCode::FORBIDDEN, "{err}");
        }
    }

    #[test]
    fn claim_messages_quote_the_claim_name() {
        let missing = GateError::MissingClaim {
            claim: "roles".into(),
        };
        let malformed = GateError::MalformedClaim {
            claim: "roles".into(),
        };

        assert_eq!(missing.to_string(), r#"Forbidden: no "roles" claim in token"#);
        assert_eq!(malformed.to_string(), r#"Forbidden: "roles" claim malformed"#);
    }

    #[tokio::test]
    async fn response_is_plain_text_with_trailing_newline() {
        let resp = GateError::MalformedToken.into_response();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Unauthorized: malformed token\n");
    }
}
