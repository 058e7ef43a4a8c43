//! Per-request group decision.
//!
//! Only the JWT payload segment is read. The signature, `exp`, `iss` and `aud`
//! are NOT verified here: the token is assumed to have been authenticated by
//! whatever sits in front of this service.
//!
//! Order of checks (first failure wins):
//! 1. `Authorization: Bearer <token>`                      -> 401
//! 2. token has exactly three `.` separated segments       -> 401
//! 3. middle segment is unpadded base64url                 -> 401
//! 4. decoded payload is a JSON object                     -> 401
//! 5. configured claim is present                          -> 403
//! 6. claim is an array                                    -> 403
//! 7. some string element is in the allow-list             -> 403 otherwise

use axum::http::{HeaderMap, header};
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::{Map, Value};

use super::config::{ConfigError, GateConfig, GroupPolicy};
use crate::error::GateError;

const BEARER_PREFIX: &[u8] = b"Bearer ";

// base64url, no padding. Non-zero trailing bits are tolerated.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

type Claims = Map<String, Value>;

/// A named, configured gate. Cheap to share behind an `Arc`; never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct GroupGate {
    name: String,
    policy: GroupPolicy,
}

impl GroupGate {
    pub fn new(name: impl Into<String>, config: GateConfig) -> Result<Self, ConfigError> {
        let policy = GroupPolicy::new(config)?;
        let gate = Self {
            name: name.into(),
            policy,
        };

        tracing::info!(
            gate = %gate.name,
            claim = %gate.policy.groups_claim(),
            groups = gate.policy.groups().len(),
            "group gate configured"
        );

        Ok(gate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decide whether the request carrying `headers` may pass.
    ///
    /// On success returns the allow-listed group that matched first.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<&str, GateError> {
        let token = bearer_token(headers)?;
        let claims = decode_claims(token)?;
        self.match_group(&claims)
    }

    fn match_group(&self, claims: &Claims) -> Result<&str, GateError> {
        let claim = self.policy.groups_claim();

        let value = claims.get(claim).ok_or_else(|| GateError::MissingClaim {
            claim: claim.to_string(),
        })?;

        let Value::Array(entries) = value else {
            return Err(GateError::MalformedClaim {
                claim: claim.to_string(),
            });
        };

        // non-string entries are skipped, not rejected
        entries
            .iter()
            .filter_map(Value::as_str)
            .find_map(|group| self.policy.allowed(group))
            .ok_or(GateError::NoMatchingGroup)
    }
}

// Raw header bytes; non-ASCII outside the payload segment is not an error.
fn bearer_token(headers: &HeaderMap) -> Result<&[u8], GateError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.as_bytes().strip_prefix(BEARER_PREFIX))
        .ok_or(GateError::MissingBearer)
}

fn decode_claims(token: &[u8]) -> Result<Claims, GateError> {
    let segments: Vec<&[u8]> = token.split(|b| *b == b'.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return Err(GateError::MalformedToken);
    };

    let bytes = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|_| GateError::InvalidEncoding)?;

    serde_json::from_slice(&bytes).map_err(|_| GateError::InvalidPayload)
}
