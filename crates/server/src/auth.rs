//! Registration, login and bearer tokens.
//!
//! Tokens are HMAC-signed JWTs whose subject is the user email.

use api_types::auth::{Token, TokenRequest, UserNew, UserView};
use axum::{
    Extension, Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{
    ServerError,
    server::{ServerState, Session},
};

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated user.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issue time, seconds since the epoch.
    pub iat: i64,
}

/// Signing material and lifetime of access tokens.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl AuthKeys {
    /// Only the HS family is accepted since tokens are signed with a shared
    /// secret.
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        expire_minutes: i64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ErrorKind::InvalidAlgorithm.into());
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            lifetime: Duration::minutes(expire_minutes),
        })
    }

    pub fn issue(&self, email: &str) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + self.lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("token creation failed: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        let validation = Validation::new(self.algorithm);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("rejected bearer token: {err}");
                ServerError::Unauthenticated("could not validate credentials".to_string())
            })
    }
}

pub(crate) fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        created_at: user.created_at,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<UserNew>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let Json(payload) = payload?;
    let user = state
        .engine
        .register_user(
            &payload.email,
            &payload.password,
            payload.full_name.as_deref(),
        )
        .await?;
    tracing::info!(user_id = %user.id, "registered new user");

    Ok((StatusCode::CREATED, Json(map_user(user))))
}

/// Exchange email and password for a bearer token.
pub async fn token(
    State(state): State<ServerState>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Result<Json<Token>, ServerError> {
    let Form(form) = form?;
    let user = state
        .engine
        .authenticate(&form.username, &form.password)
        .await?;
    let access_token = state.auth.issue(&user.email)?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(Extension(session): Extension<Session>) -> Result<Json<UserView>, ServerError> {
    Ok(Json(map_user(session.require()?)))
}
