use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use std::sync::Arc;

use crate::{AuthKeys, ServerError, auth, categories, summary, transactions};
use engine::{Engine, EngineError, User};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthKeys>,
}

/// Caller identity resolved from the bearer token, if any.
#[derive(Clone, Debug)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|user| user.id)
    }

    /// The authenticated user, or 401 for anonymous callers.
    pub fn require(self) -> Result<User, ServerError> {
        self.user
            .ok_or_else(|| ServerError::Unauthenticated("not authenticated".to_string()))
    }
}

/// Resolve the optional bearer token into a [`Session`].
///
/// A request without `Authorization` is anonymous; a malformed, expired or
/// unknown token is rejected outright.
async fn session(
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user = match bearer {
        Ok(TypedHeader(Authorization(bearer))) => {
            let claims = state.auth.verify(bearer.token())?;
            match state.engine.user_by_email(&claims.sub).await {
                Ok(user) => Some(user),
                Err(EngineError::KeyNotFound(_)) => {
                    return Err(ServerError::Unauthenticated(
                        "could not validate credentials".to_string(),
                    ));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(rejection) if rejection.is_missing() => None,
        Err(_) => {
            return Err(ServerError::Unauthenticated(
                "malformed authorization header".to_string(),
            ));
        }
    };

    request.extensions_mut().insert(Session { user });
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::token))
        .route("/auth/me", get(auth::me))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/summary", get(summary::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    auth: AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(auth),
    };

    axum::serve(listener, router(state)).await
}
