//! Spending summary endpoint.

use api_types::summary::{
    BreakdownItem, CategoryBreakdown, Metrics, SummaryQuery, SummaryResponse, Totals,
    TransactionSummary,
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::{Summary, SummaryFilter, TransactionRecord};

use crate::{
    ServerError,
    server::{ServerState, Session},
};

fn map_items(items: Vec<engine::BreakdownItem>) -> Vec<BreakdownItem> {
    items
        .into_iter()
        .map(|item| BreakdownItem {
            category: item.category,
            total: item.total.to_string(),
        })
        .collect()
}

fn map_extreme(record: TransactionRecord) -> TransactionSummary {
    TransactionSummary {
        id: record.id,
        description: record.description,
        amount: record.amount.to_string(),
        date: record.date,
        category_name: record.category_name,
    }
}

fn map_summary(summary: Summary) -> SummaryResponse {
    SummaryResponse {
        totals: Totals {
            income: summary.totals.income.to_string(),
            expense: summary.totals.expense.to_string(),
            net: summary.totals.net.to_string(),
        },
        category_breakdown: CategoryBreakdown {
            income: map_items(summary.category_breakdown.income),
            expense: map_items(summary.category_breakdown.expense),
        },
        metrics: Metrics {
            average_daily_net: summary.metrics.average_daily_net.to_string(),
            average_daily_income: summary.metrics.average_daily_income.to_string(),
            average_daily_expense: summary.metrics.average_daily_expense.to_string(),
            largest_expense: summary.metrics.largest_expense.map(map_extreme),
            largest_income: summary.metrics.largest_income.map(map_extreme),
        },
    }
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let user = session.require()?;
    let Query(query) = query?;
    let filter = SummaryFilter {
        category_id: query.category_id,
        from_date: query.from_date,
        to_date: query.to_date,
    };
    let summary = state.engine.summary(user.id, &filter).await?;

    Ok(Json(map_summary(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_serializes_zeroes_and_nulls() {
        let response = map_summary(Summary::default());
        assert_eq!(response.totals.net, "0.00");
        assert_eq!(response.metrics.average_daily_income, "0.00");
        assert!(response.metrics.largest_income.is_none());
        assert!(response.category_breakdown.expense.is_empty());
    }
}
