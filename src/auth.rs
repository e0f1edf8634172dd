use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, error::ApiError, routes::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

pub fn generate_token(config: &JwtConfig, user_id: i64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let ttl = u64::try_from(config.expiration_days)? * 24 * 60 * 60;
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + ttl,
        iat: now,
        iss: config.issuer.to_owned(),
        sub: user_id.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Returns the user id carried by a valid token.
pub fn verify_token(config: &JwtConfig, token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .ok()?;

    token_data.claims.sub.parse().ok()
}

/// `Authorization: Token <jwt>` or `Authorization: Bearer <jwt>`.
fn bearer(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .ok_or(ApiError::InvalidToken)?;

    Ok(Some(token.trim()))
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<i64>, ApiError> {
    let Some(token) = bearer(parts)? else {
        return Ok(None);
    };

    let Some(user_id) = verify_token(&state.config.jwt, token) else {
        return Err(ApiError::InvalidToken);
    };

    if foodgram_user::find_by_id(&state.read_db, user_id)
        .await?
        .is_none()
    {
        tracing::debug!(user_id, "token of a deleted user");
        return Err(ApiError::InvalidToken);
    }

    Ok(Some(user_id))
}

/// Authenticated caller, rejects anonymous requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
            .await?
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Optional caller, a missing header is anonymous but a bad token is still 401.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<i64>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(authenticate(parts, state).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 7,
            issuer: "foodgram".to_owned(),
            audience: "foodgram-api".to_owned(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = generate_token(&config(), 42).unwrap();
        assert_eq!(verify_token(&config(), &token), Some(42));
    }

    #[test]
    fn test_token_checks_secret_and_audience() {
        let token = generate_token(&config(), 42).unwrap();

        let mut other = config();
        other.secret = "another_secret_key_minimum_32_characters".to_owned();
        assert_eq!(verify_token(&other, &token), None);

        let mut other = config();
        other.audience = "someone-else".to_owned();
        assert_eq!(verify_token(&other, &token), None);

        assert_eq!(verify_token(&config(), "garbage"), None);
    }
}
