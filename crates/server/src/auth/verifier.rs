use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;

use claimdesk_core::ClaimdeskError;

use super::identity::CallerIdentity;
use super::jwks::JwksCache;

/// Claims this service reads from a verified token.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// How bearer tokens are verified, selected once at process start.
pub enum VerificationMode {
    /// Verify RS256 signatures against the remote key set; reject tokens
    /// whose key id is absent from the set.
    Jwks {
        jwks: JwksCache,
        audience: Option<String>,
    },
    /// Decode claims without signature verification. Expiry is still
    /// enforced. This mode exists for local development only and must be
    /// selected explicitly in configuration — it is never a fallback.
    InsecureLocal,
}

/// Validates bearer tokens and produces a caller identity.
///
/// Every failure mode — malformed token, unknown key, bad signature,
/// expired token, audience mismatch, unreachable key source — normalizes to
/// [`ClaimdeskError::Unauthenticated`] so the error shape leaks nothing.
pub struct TokenVerifier {
    mode: VerificationMode,
}

impl TokenVerifier {
    /// Verifier backed by a remote key set.
    #[must_use]
    pub fn jwks(url: impl Into<String>, audience: Option<String>, cache_ttl: Duration) -> Self {
        Self {
            mode: VerificationMode::Jwks {
                jwks: JwksCache::new(url, cache_ttl),
                audience,
            },
        }
    }

    /// Verifier for local development: claims are trusted unverified.
    #[must_use]
    pub fn insecure_local() -> Self {
        Self {
            mode: VerificationMode::InsecureLocal,
        }
    }

    /// Returns `true` when this verifier checks signatures.
    #[must_use]
    pub fn verifies_signatures(&self) -> bool {
        matches!(self.mode, VerificationMode::Jwks { .. })
    }

    /// Verify a bearer token and resolve the caller identity.
    pub async fn verify(&self, token: &str) -> Result<CallerIdentity, ClaimdeskError> {
        match &self.mode {
            VerificationMode::Jwks { jwks, audience } => {
                let header = decode_header(token).map_err(unauthenticated)?;
                let kid = header.kid.ok_or_else(|| {
                    ClaimdeskError::Unauthenticated("token header carries no key id".to_owned())
                })?;

                let key = jwks
                    .get(&kid)
                    .await
                    .map_err(ClaimdeskError::Unauthenticated)?
                    .ok_or_else(|| {
                        ClaimdeskError::Unauthenticated(
                            "no verification key matches the token".to_owned(),
                        )
                    })?;

                let (n, e) = match (&key.n, &key.e) {
                    (Some(n), Some(e)) => (n.as_str(), e.as_str()),
                    _ => {
                        return Err(ClaimdeskError::Unauthenticated(
                            "matched verification key is not an RSA key".to_owned(),
                        ));
                    }
                };
                let decoding_key =
                    DecodingKey::from_rsa_components(n, e).map_err(unauthenticated)?;

                let mut validation = Validation::new(Algorithm::RS256);
                match audience {
                    Some(audience) => validation.set_audience(&[audience]),
                    None => validation.validate_aud = false,
                }

                let data =
                    decode::<Claims>(token, &decoding_key, &validation).map_err(unauthenticated)?;
                Ok(CallerIdentity {
                    id: data.claims.sub,
                    email: data.claims.email,
                })
            }
            VerificationMode::InsecureLocal => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.insecure_disable_signature_validation();
                validation.validate_aud = false;
                validation.algorithms = vec![Algorithm::HS256, Algorithm::RS256, Algorithm::ES256];

                let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
                    .map_err(unauthenticated)?;
                Ok(CallerIdentity {
                    id: data.claims.sub,
                    email: data.claims.email,
                })
            }
        }
    }
}

fn unauthenticated(err: jsonwebtoken::errors::Error) -> ClaimdeskError {
    ClaimdeskError::Unauthenticated(err.to_string())
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: Option<String>,
        exp: u64,
    }

    fn mint(sub: &str, email: Option<&str>, exp_offset_secs: i64) -> String {
        #[allow(clippy::cast_sign_loss)]
        let exp = (get_current_timestamp() as i64 + exp_offset_secs) as u64;
        let claims = TestClaims {
            sub: sub.to_owned(),
            email: email.map(ToOwned::to_owned),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"local-test-secret"),
        )
        .expect("token should encode")
    }

    #[tokio::test]
    async fn insecure_local_resolves_claims() {
        let verifier = TokenVerifier::insecure_local();
        let token = mint("user-1", Some("a@example.com"), 3600);

        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_even_without_signature_checks() {
        let verifier = TokenVerifier::insecure_local();
        let token = mint("user-1", None, -3600);

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let verifier = TokenVerifier::insecure_local();
        let err = verifier.verify("not-a-token").await.unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn jwks_mode_rejects_token_without_kid() {
        let verifier = TokenVerifier::jwks(
            "http://127.0.0.1:1/jwks.json",
            None,
            Duration::from_secs(300),
        );
        // HS256 default header has no kid; rejection happens before any fetch.
        let token = mint("user-1", None, 3600);

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn jwks_mode_fails_closed_when_source_is_unreachable() {
        let verifier = TokenVerifier::jwks(
            "http://127.0.0.1:1/jwks.json",
            None,
            Duration::from_secs(300),
        );
        let mut header = Header::default();
        header.kid = Some("k1".to_owned());
        let claims = TestClaims {
            sub: "user-1".to_owned(),
            email: None,
            exp: get_current_timestamp() + 3600,
        };
        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(b"local-test-secret"),
        )
        .unwrap();

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unauthenticated(_)));
    }

    #[test]
    fn mode_predicate() {
        assert!(!TokenVerifier::insecure_local().verifies_signatures());
        assert!(
            TokenVerifier::jwks("http://example.com", None, Duration::from_secs(1))
                .verifies_signatures()
        );
    }
}
