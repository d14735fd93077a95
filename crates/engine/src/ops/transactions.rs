use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, Transaction, TransactionRecord, categories,
    transactions,
    util::{validate_amount, validate_description},
};

use super::{Engine, categories::usable_category, with_tx};

mod list;

pub use list::{SortBy, SortOrder, TransactionQuery};

/// Partial update of a transaction; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub amount: Option<MoneyCents>,
    pub date: Option<NaiveDate>,
}

impl Engine {
    /// Record a new transaction for `user_id`.
    ///
    /// The category must be global or owned by the user, otherwise the call
    /// fails with [`EngineError::InvalidCategory`]. `date` defaults to today
    /// (UTC).
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        description: &str,
        amount: MoneyCents,
        date: Option<NaiveDate>,
    ) -> ResultEngine<TransactionRecord> {
        let tx = Transaction::new(user_id, category_id, description, amount, date)?;
        with_tx!(self, |db_tx| {
            let category = usable_category(&db_tx, category_id, user_id).await?;
            let model = transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            TransactionRecord::from_models(model, Some(category))
        })
    }

    /// Return one transaction of `user_id`.
    pub async fn transaction(&self, user_id: Uuid, id: Uuid) -> ResultEngine<TransactionRecord> {
        find_record(&self.database, user_id, id).await
    }

    /// Apply `patch` to a transaction of `user_id` and bump its
    /// `last_changed`.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<TransactionRecord> {
        let description = patch
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        with_tx!(self, |db_tx| {
            let current = find_record(&db_tx, user_id, id).await?;
            let mut tx = Transaction {
                id: current.id,
                user_id: current.user_id,
                category_id: current.category_id,
                description: current.description,
                amount: current.amount,
                date: current.date,
                last_changed: Utc::now(),
            };

            let category = match patch.category_id {
                Some(category_id) => {
                    let category = usable_category(&db_tx, category_id, user_id).await?;
                    tx.category_id = category.id;
                    Some(category)
                }
                None => None,
            };
            if let Some(description) = description {
                tx.description = description;
            }
            if let Some(amount) = patch.amount {
                tx.amount = amount;
            }
            if let Some(date) = patch.date {
                tx.date = date;
            }

            let model = transactions::ActiveModel::from(&tx).update(&db_tx).await?;
            match category {
                Some(category) => TransactionRecord::from_models(model, Some(category)),
                None => Ok(TransactionRecord {
                    id: model.id,
                    user_id: model.user_id,
                    category_id: model.category_id,
                    category_name: current.category_name,
                    category_kind: current.category_kind,
                    description: model.description,
                    amount: MoneyCents::new(model.amount_minor),
                    date: model.date,
                    last_changed: model.last_changed,
                }),
            }
        })
    }

    /// Delete a transaction of `user_id`.
    pub async fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("transaction {id}")));
        }
        Ok(())
    }
}

/// Load a transaction of `user_id` joined with its category. Transactions of
/// other users are reported as missing.
async fn find_record<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: Uuid,
) -> ResultEngine<TransactionRecord> {
    let Some((model, category)) = transactions::Entity::find_by_id(id)
        .filter(transactions::Column::UserId.eq(user_id))
        .find_also_related(categories::Entity)
        .one(db)
        .await?
    else {
        return Err(EngineError::KeyNotFound(format!("transaction {id}")));
    };
    TransactionRecord::from_models(model, category)
}
