use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine, TransactionRecord, categories,
    summary::{Summary, SummaryWindow, summarize},
    transactions,
    util::validate_date_range,
};

use super::Engine;

/// Selection of the transactions a summary is computed on. Date bounds are
/// inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub category_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl SummaryFilter {
    pub fn window(&self) -> SummaryWindow {
        SummaryWindow {
            from: self.from_date,
            to: self.to_date,
        }
    }
}

impl Engine {
    /// Every transaction of `user_id` matching `filter`, joined with its
    /// category and ordered oldest first.
    ///
    /// There is no paging: a summary must see the whole selection.
    pub async fn summary_transactions(
        &self,
        user_id: Uuid,
        filter: &SummaryFilter,
    ) -> ResultEngine<Vec<TransactionRecord>> {
        validate_date_range(filter.from_date, filter.to_date)?;

        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.from_date {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(transactions::Column::Date.lte(to));
        }

        let rows = query
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::LastChanged)
            .find_also_related(categories::Entity)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(tx, category)| {
                TransactionRecord::from_models(tx, category).inspect_err(|err| {
                    tracing::error!(user_id = %user_id, "cannot summarize: {err}");
                })
            })
            .collect()
    }

    /// Spending summary of `user_id` over the transactions selected by
    /// `filter`.
    pub async fn summary(&self, user_id: Uuid, filter: &SummaryFilter) -> ResultEngine<Summary> {
        let records = self.summary_transactions(user_id, filter).await?;
        Ok(summarize(&records, &filter.window()))
    }
}
