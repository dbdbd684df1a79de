use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// Errors returned by access-token issuance and verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid key material: {0}")]
    Key(String),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubUuid,
    #[error("token ttl out of range: {0}s")]
    TtlOutOfRange(u64),
}

/// Access token (JWT) claims.
///
/// `email` carries the principal identifier so the access gate never needs a
/// database round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Verified token, promoted into the types the app works with.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: Uuid,
    pub email: String,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// EdDSA (Ed25519) access-token issuer and verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl AuthService {
    /// `private_key_pem` must be an Ed25519 PKCS#8 PEM, `public_key_pem` the
    /// matching SPKI PEM.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        ttl_seconds: u64,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_ed_pem(private_key_pem.as_bytes())
            .map_err(|e| TokenError::Key(format!("ed25519 private key pem: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| TokenError::Key(format!("ed25519 public key pem: {}", e)))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl_seconds,
        })
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(TokenError::TtlOutOfRange(self.ttl_seconds))?;
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims).map(|token| IssuedToken {
            token,
            expires_in: self.ttl_seconds,
        })
    }

    pub fn sign(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::EdDSA);
        header.typ = Some("JWT".to_string());
        Ok(jsonwebtoken::encode(&header, claims, &self.encoding_key)?)
    }

    /// Verify signature, `iss`/`aud`/`exp`, then require a UUID `sub` and a
    /// non-empty `email`.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let claims = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?
        .claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }
        if claims.email.trim().is_empty() {
            return Err(TokenError::EmptyClaim("email"));
        }
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubUuid)?;

        Ok(VerifiedAccessToken {
            user_id,
            email: claims.email,
            jti: claims.jti,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_keys::{PRIVATE_KEY_PEM, PUBLIC_KEY_PEM};
    use super::*;

    fn service(issuer: &str, audience: &str) -> AuthService {
        AuthService::new(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM, issuer, audience, 600, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let auth = service("shop-api", "shop-clients");
        let user_id = Uuid::new_v4();

        let issued = auth.issue(user_id, "admin@admin.com").unwrap();
        assert_eq!(issued.expires_in, 600);

        let verified = auth.verify(&issued.token).unwrap();
        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.email, "admin@admin.com");
        assert!(!verified.jti.is_empty());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let issuer = service("shop-api", "other-clients");
        let verifier = service("shop-api", "shop-clients");

        let issued = issuer.issue(Uuid::new_v4(), "user@gmail.com").unwrap();
        assert!(matches!(
            verifier.verify(&issued.token),
            Err(TokenError::Jwt(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service("shop-api", "shop-clients");
        let now = chrono::Utc::now().timestamp();
        let claims = AccessTokenClaims {
            iss: "shop-api".into(),
            aud: "shop-clients".into(),
            sub: Uuid::new_v4().to_string(),
            email: "admin@admin.com".into(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = auth.sign(&claims).unwrap();

        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let auth = service("shop-api", "shop-clients");
        let now = chrono::Utc::now().timestamp();
        let claims = AccessTokenClaims {
            iss: "shop-api".into(),
            aud: "shop-clients".into(),
            sub: "admin".into(),
            email: "admin@admin.com".into(),
            iat: now,
            exp: now + 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = auth.sign(&claims).unwrap();

        assert!(matches!(auth.verify(&token), Err(TokenError::InvalidSubUuid)));
    }

    #[test]
    fn garbage_is_rejected() {
        let auth = service("shop-api", "shop-clients");
        assert!(auth.verify("not-a-jwt").is_err());
    }

    #[test]
    fn oversized_ttl_is_an_error_not_an_expired_token() {
        for ttl in [u64::MAX, i64::MAX as u64] {
            let auth =
                AuthService::new(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM, "i", "a", ttl, 0).unwrap();
            assert!(matches!(
                auth.issue(Uuid::new_v4(), "admin@admin.com"),
                Err(TokenError::TtlOutOfRange(t)) if t == ttl
            ));
        }
    }

    #[test]
    fn bad_pem_fails_construction() {
        let err = AuthService::new("nope", PUBLIC_KEY_PEM, "i", "a", 60, 0).unwrap_err();
        assert!(matches!(err, TokenError::Key(_)));
    }
}
