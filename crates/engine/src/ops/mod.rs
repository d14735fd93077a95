use sea_orm::DatabaseConnection;

use crate::{MoneyCents, ResultEngine};

mod categories;
mod summary;
mod transactions;
mod users;

pub use summary::SummaryFilter;
pub use transactions::{SortBy, SortOrder, TransactionPatch, TransactionQuery};

/// Amount credited to every new user on registration.
pub const DEFAULT_INITIAL_TRANSACTION_AMOUNT: MoneyCents = MoneyCents::new(1000_00);

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
    initial_transaction_amount: MoneyCents,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: u32,
    initial_transaction_amount: MoneyCents,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            password_cost: bcrypt::DEFAULT_COST,
            initial_transaction_amount: DEFAULT_INITIAL_TRANSACTION_AMOUNT,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt cost used to hash new passwords.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    /// Amount of the opening transaction created on registration.
    pub fn initial_transaction_amount(mut self, amount: MoneyCents) -> EngineBuilder {
        self.initial_transaction_amount = amount;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        crate::util::validate_amount(self.initial_transaction_amount)?;
        Ok(Engine {
            database: self.database,
            password_cost: self.password_cost,
            initial_transaction_amount: self.initial_transaction_amount,
        })
    }
}
