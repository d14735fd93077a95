use chrono::NaiveDate;
use sea_orm::{
    QueryFilter, QueryOrder, QuerySelect, Select,
    prelude::*,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    CategoryKind, EngineError, MoneyCents, ResultEngine, TransactionRecord, categories,
    transactions,
    util::validate_date_range,
};

use super::super::Engine;

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Date,
    Amount,
    Description,
    LastChanged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrder> for sea_orm::Order {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Filters, sorting and paging for [`Engine::list_transactions`].
///
/// Date and amount bounds are inclusive. `description_query` matches a
/// case-insensitive substring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionQuery {
    pub offset: u64,
    pub limit: u64,
    pub category_id: Option<Uuid>,
    pub min_amount: Option<MoneyCents>,
    pub max_amount: Option<MoneyCents>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub category_type: Option<CategoryKind>,
    pub description_query: Option<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            category_id: None,
            min_amount: None,
            max_amount: None,
            from_date: None,
            to_date: None,
            category_type: None,
            description_query: None,
            sort_by: SortBy::default(),
            order: SortOrder::default(),
        }
    }
}

fn validate_query(query: &TransactionQuery) -> ResultEngine<()> {
    if !(1..=MAX_LIMIT).contains(&query.limit) {
        return Err(EngineError::InvalidQuery(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if query.min_amount.is_some_and(MoneyCents::is_negative)
        || query.max_amount.is_some_and(MoneyCents::is_negative)
    {
        return Err(EngineError::InvalidQuery(
            "amount bounds must be >= 0".to_string(),
        ));
    }
    validate_date_range(query.from_date, query.to_date)
}

trait ApplyListFilters: QueryFilter + Sized {
    fn apply_list_filters(self, query: &TransactionQuery) -> Self;
}

impl<T> ApplyListFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_list_filters(mut self, query: &TransactionQuery) -> Self {
        if let Some(category_id) = query.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(min) = query.min_amount {
            self = self.filter(transactions::Column::AmountMinor.gte(min.cents()));
        }
        if let Some(max) = query.max_amount {
            self = self.filter(transactions::Column::AmountMinor.lte(max.cents()));
        }
        if let Some(from) = query.from_date {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = query.to_date {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(kind) = query.category_type {
            self = self.filter(categories::Column::CategoryType.eq(kind.as_str()));
        }
        if let Some(needle) = query
            .description_query
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", needle.to_lowercase());
            self = self.filter(
                Expr::expr(Func::lower(Expr::col((
                    transactions::Entity,
                    transactions::Column::Description,
                ))))
                .like(pattern),
            );
        }
        self
    }
}

fn sorted(
    select: sea_orm::SelectTwo<transactions::Entity, categories::Entity>,
    sort_by: SortBy,
    order: SortOrder,
) -> sea_orm::SelectTwo<transactions::Entity, categories::Entity> {
    let column = match sort_by {
        SortBy::Date => transactions::Column::Date,
        SortBy::Amount => transactions::Column::AmountMinor,
        SortBy::Description => transactions::Column::Description,
        SortBy::LastChanged => transactions::Column::LastChanged,
    };
    let order: sea_orm::Order = order.into();
    select
        .order_by(column, order.clone())
        .order_by(transactions::Column::LastChanged, order.clone())
        .order_by(transactions::Column::Id, order)
}

impl Engine {
    /// Lists the transactions of `user_id` matching `query`, joined with their
    /// category.
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        query: &TransactionQuery,
    ) -> ResultEngine<Vec<TransactionRecord>> {
        validate_query(query)?;

        let base: Select<transactions::Entity> =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
        let select = sorted(
            base.find_also_related(categories::Entity)
                .apply_list_filters(query),
            query.sort_by,
            query.order,
        )
        .offset(query.offset)
        .limit(query.limit);

        select
            .all(&self.database)
            .await?
            .into_iter()
            .map(|(tx, category)| TransactionRecord::from_models(tx, category))
            .collect()
    }
}
