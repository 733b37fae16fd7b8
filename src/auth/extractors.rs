use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};

use crate::auth::claims::Claims;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Verifies bearer tokens minted by the identity provider. Token issuance is
/// not handled here; only signature, issuer and audience checks.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl FromRef<AppState> for JwtVerifier {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }
}

impl JwtVerifier {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer JWT, returning the opaque user ID.
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtVerifier: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = JwtVerifier::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = match verifier.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(ApiError::Unauthorized("Invalid or expired token".into()));
            }
        };

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    fn make_verifier(secret: &str, issuer: &str, audience: &str) -> JwtVerifier {
        JwtVerifier {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    fn sign(secret: &str, issuer: &str, audience: &str, sub: &str) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: sub.into(),
            iat: now,
            exp: now + 300,
            iss: issuer.into(),
            aud: audience.into(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("sign token")
    }

    #[test]
    fn verify_accepts_valid_token() {
        let verifier = make_verifier("dev-secret", "test-issuer", "test-aud");
        let token = sign("dev-secret", "test-issuer", "test-aud", "auth0|user-1");
        let claims = verifier.verify(&token).expect("verify token");
        assert_eq!(claims.sub, "auth0|user-1");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let verifier = make_verifier("same-secret", "good-iss", "good-aud");
        let token = sign("same-secret", "bad-iss", "bad-aud", "auth0|user-1");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let verifier = make_verifier("secret-a", "iss", "aud");
        let token = sign("secret-b", "iss", "aud", "auth0|user-1");
        assert!(verifier.verify(&token).is_err());
    }
}
