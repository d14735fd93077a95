//! Core of homebudget: users, income/expense categories, transactions and
//! the aggregation of transactions into spending summaries.
//!
//! All operations go through [`Engine`], built with [`Engine::builder`] on top
//! of a sea-orm connection. The aggregation itself lives in [`summary`] and is
//! a pure function over [`TransactionRecord`]s.

pub use categories::{Category, CategoryKind, OPENING_BALANCE_CATEGORY};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    DEFAULT_INITIAL_TRANSACTION_AMOUNT, Engine, EngineBuilder, SortBy, SortOrder, SummaryFilter,
    TransactionPatch, TransactionQuery,
};
pub use summary::{BreakdownItem, CategoryBreakdown, Metrics, Summary, SummaryWindow, Totals};
pub use transactions::{Transaction, TransactionRecord};
pub use users::User;

mod categories;
mod error;
mod money;
mod ops;
pub mod summary;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
