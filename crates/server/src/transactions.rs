use api_types::{
    Message,
    transaction::{
        SortBy, SortOrder, TransactionList, TransactionNew, TransactionUpdate, TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{TransactionPatch, TransactionQuery, TransactionRecord};
use uuid::Uuid;

use crate::{
    ServerError,
    categories::{kind_from, map_kind},
    parse_amount,
    server::{ServerState, Session},
};

fn map_transaction(record: TransactionRecord) -> TransactionView {
    TransactionView {
        id: record.id,
        user_id: record.user_id,
        category_id: record.category_id,
        category_name: record.category_name,
        category_type: map_kind(record.category_kind),
        description: record.description,
        amount: record.amount.to_string(),
        date: record.date,
        last_changed: record.last_changed,
    }
}

fn map_sort_by(sort_by: SortBy) -> engine::SortBy {
    match sort_by {
        SortBy::Date => engine::SortBy::Date,
        SortBy::Amount => engine::SortBy::Amount,
        SortBy::Description => engine::SortBy::Description,
        SortBy::LastChanged => engine::SortBy::LastChanged,
    }
}

fn map_order(order: SortOrder) -> engine::SortOrder {
    match order {
        SortOrder::Asc => engine::SortOrder::Asc,
        SortOrder::Desc => engine::SortOrder::Desc,
    }
}

fn list_query(list: TransactionList) -> Result<TransactionQuery, ServerError> {
    let defaults = TransactionQuery::default();
    Ok(TransactionQuery {
        offset: list.offset.unwrap_or(defaults.offset),
        limit: list.limit.unwrap_or(defaults.limit),
        category_id: list.category_id,
        min_amount: list.min_amount.as_deref().map(parse_amount).transpose()?,
        max_amount: list.max_amount.as_deref().map(parse_amount).transpose()?,
        from_date: list.from_date,
        to_date: list.to_date,
        category_type: list.category_type.map(kind_from),
        description_query: list.description_query,
        sort_by: list.sort_by.map(map_sort_by).unwrap_or(defaults.sort_by),
        order: list.order.map(map_order).unwrap_or(defaults.order),
    })
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionList>, QueryRejection>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let user = session.require()?;
    let Query(query) = query?;
    let transactions = state
        .engine
        .list_transactions(user.id, &list_query(query)?)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(transactions))
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let user = session.require()?;
    let record = state.engine.transaction(user.id, id).await?;
    Ok(Json(map_transaction(record)))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let user = session.require()?;
    let Json(payload) = payload?;
    let amount = parse_amount(&payload.amount.to_string())?;
    let record = state
        .engine
        .create_transaction(
            user.id,
            payload.category_id,
            &payload.description,
            amount,
            payload.date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_transaction(record))))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let user = session.require()?;
    let Json(payload) = payload?;
    let patch = TransactionPatch {
        category_id: payload.category_id,
        description: payload.description,
        amount: payload
            .amount
            .map(|amount| parse_amount(&amount.to_string()))
            .transpose()?,
        date: payload.date,
    };
    let record = state.engine.update_transaction(user.id, id, patch).await?;

    Ok(Json(map_transaction(record)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ServerError> {
    let user = session.require()?;
    state.engine.delete_transaction(user.id, id).await?;

    Ok(Json(Message {
        message: "Transaction deleted successfully".to_string(),
    }))
}
