use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use engine::EngineError;
use serde::Serialize;

pub use auth::AuthKeys;
pub use jsonwebtoken::Algorithm;
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod categories;
mod server;
mod summary;
mod transactions;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Missing, malformed or expired bearer token.
    Unauthenticated(String),
    /// Request that could not be decoded (query string or body).
    Invalid(String),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::CategoryInUse(_) => StatusCode::CONFLICT,
        EngineError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Database(_)
        | EngineError::PasswordHash(_)
        | EngineError::UnresolvedCategory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidEmail(_)
        | EngineError::InvalidPassword(_)
        | EngineError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        err @ EngineError::UnresolvedCategory(_) => {
            tracing::error!("{err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Unauthenticated(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Invalid(err) => (StatusCode::UNPROCESSABLE_ENTITY, err),
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let mut response = (status, Json(Error { error })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Invalid(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Invalid(value.body_text())
    }
}

impl From<FormRejection> for ServerError {
    fn from(value: FormRejection) -> Self {
        Self::Invalid(value.body_text())
    }
}

/// Parse a decimal amount coming from a request.
fn parse_amount(value: &str) -> Result<engine::MoneyCents, ServerError> {
    Ok(value.parse::<engine::MoneyCents>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflicts_map_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let res = ServerError::from(EngineError::CategoryInUse("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidName("x".to_string()),
            EngineError::InvalidDate("x".to_string()),
            EngineError::InvalidEmail("x".to_string()),
            EngineError::InvalidPassword("x".to_string()),
            EngineError::InvalidQuery("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn invalid_category_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidCategory("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unresolved_category_maps_to_500() {
        let res =
            ServerError::from(EngineError::UnresolvedCategory("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthenticated_maps_to_401_with_challenge() {
        for res in [
            ServerError::Unauthenticated("no token".to_string()).into_response(),
            ServerError::from(EngineError::InvalidCredentials).into_response(),
        ] {
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    #[test]
    fn invalid_request_maps_to_422() {
        let res = ServerError::Invalid("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn amounts_with_three_decimals_are_rejected() {
        assert!(parse_amount("10.50").is_ok());
        assert!(matches!(
            parse_amount("10.505"),
            Err(ServerError::Engine(EngineError::InvalidAmount(_)))
        ));
    }
}
