//! Request and response bodies of the homebudget HTTP API.
//!
//! Money always travels as a decimal string with two fractional digits
//! (`"12.30"`). Inputs also accept a JSON number, see [`Amount`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An amount of money as sent by clients: either `"12.30"` or `12.3`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Plain confirmation returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: String,
        pub password: String,
        pub full_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub full_name: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Login form (`application/x-www-form-urlencoded`). `username` carries
    /// the email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Token {
        pub access_token: String,
        /// Always `"bearer"`.
        pub token_type: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryType {
        Income,
        Expense,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        pub category_type: Option<CategoryType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub category_type: CategoryType,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub category_type: Option<CategoryType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub category_type: CategoryType,
        /// `None` for global categories.
        pub user_id: Option<Uuid>,
        pub last_changed: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::{category::CategoryType, *};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortBy {
        Date,
        Amount,
        Description,
        LastChanged,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        Asc,
        Desc,
    }

    /// Query string of `GET /transactions`. Bounds are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub offset: Option<u64>,
        pub limit: Option<u64>,
        pub category_id: Option<Uuid>,
        pub min_amount: Option<String>,
        pub max_amount: Option<String>,
        pub from_date: Option<NaiveDate>,
        pub to_date: Option<NaiveDate>,
        pub category_type: Option<CategoryType>,
        /// Case-insensitive substring of the description.
        pub description_query: Option<String>,
        pub sort_by: Option<SortBy>,
        pub order: Option<SortOrder>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub category_id: Uuid,
        pub description: String,
        pub amount: Amount,
        /// Defaults to the current date (UTC).
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        pub amount: Option<Amount>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub category_id: Uuid,
        pub category_name: String,
        pub category_type: CategoryType,
        pub description: String,
        pub amount: String,
        pub date: NaiveDate,
        pub last_changed: DateTime<Utc>,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub from_date: Option<NaiveDate>,
        pub to_date: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Totals {
        pub income: String,
        pub expense: String,
        pub net: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BreakdownItem {
        pub category: String,
        pub total: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBreakdown {
        pub income: Vec<BreakdownItem>,
        pub expense: Vec<BreakdownItem>,
    }

    /// The transaction reported as largest income or expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSummary {
        pub id: Uuid,
        pub description: String,
        pub amount: String,
        pub date: NaiveDate,
        pub category_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Metrics {
        pub average_daily_net: String,
        pub average_daily_income: String,
        pub average_daily_expense: String,
        pub largest_expense: Option<TransactionSummary>,
        pub largest_income: Option<TransactionSummary>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub totals: Totals,
        pub category_breakdown: CategoryBreakdown,
        pub metrics: Metrics,
    }
}
