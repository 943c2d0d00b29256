//! Caller authentication with HS256 bearer tokens.
//!
//! Tokens are issued by an identity provider sharing `JWT_SECRET` with this
//! server (or by `tournament_server --issue-token <identity>` for operators).
//! The token subject becomes the caller identity handed to the tournament
//! manager and the oracle, so callers cannot claim an identity they were not
//! issued.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tournament_oracle::ids::Identity;

/// JWT claims identifying a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerClaims {
    pub sub: String, // Caller identity
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
}

/// Issues and verifies caller tokens
#[derive(Clone)]
pub struct CallerAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CallerAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verify a token and return the caller identity it was issued for
    pub fn verify(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let token_data = decode::<CallerClaims>(token, &self.decoding, &Validation::default())?;
        Ok(Identity::new(token_data.claims.sub))
    }

    /// Issue a token for `identity` valid for `ttl`
    pub fn issue(
        &self,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = CallerClaims {
            sub: identity.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }
}
