//! Categories API endpoints.
//!
//! Reads are open to anonymous callers, who only see global categories.

use api_types::{
    Message,
    category::{CategoryList, CategoryNew, CategoryType, CategoryUpdate, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::CategoryKind;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, Session},
};

pub(crate) fn map_kind(kind: CategoryKind) -> CategoryType {
    match kind {
        CategoryKind::Income => CategoryType::Income,
        CategoryKind::Expense => CategoryType::Expense,
    }
}

pub(crate) fn kind_from(category_type: CategoryType) -> CategoryKind {
    match category_type {
        CategoryType::Income => CategoryKind::Income,
        CategoryType::Expense => CategoryKind::Expense,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        category_type: map_kind(category.kind),
        user_id: category.user_id,
        last_changed: category.last_changed,
    }
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    query: Result<Query<CategoryList>, QueryRejection>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let Query(query) = query?;
    let categories = state
        .engine
        .list_categories(session.user_id(), query.category_type.map(kind_from))
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(categories))
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id, session.user_id()).await?;
    Ok(Json(map_category(category)))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let user = session.require()?;
    let Json(payload) = payload?;
    let category = state
        .engine
        .create_category(user.id, &payload.name, kind_from(payload.category_type))
        .await?;

    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let user = session.require()?;
    let Json(payload) = payload?;
    let category = state
        .engine
        .update_category(
            user.id,
            id,
            payload.name.as_deref(),
            payload.category_type.map(kind_from),
        )
        .await?;

    Ok(Json(map_category(category)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ServerError> {
    let user = session.require()?;
    state.engine.delete_category(user.id, id).await?;

    Ok(Json(Message {
        message: "Category deleted successfully".to_string(),
    }))
}
