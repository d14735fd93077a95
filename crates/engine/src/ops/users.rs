use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryKind, EngineError, ResultEngine, Transaction, User, categories,
    categories::OPENING_BALANCE_CATEGORY,
    transactions, users,
    util::{normalize_email, normalize_optional_text, validate_password},
};

use super::{Engine, with_tx};

const OPENING_BALANCE_DESCRIPTION: &str = "Predefined amount of money on account";

/// bcrypt is CPU bound, keep it off the async workers.
async fn hash_password(password: &str, cost: u32) -> ResultEngine<String> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| EngineError::PasswordHash(err.to_string()))??;
    Ok(hash)
}

async fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| EngineError::PasswordHash(err.to_string()))??;
    Ok(matches)
}

impl Engine {
    /// Register a new user.
    ///
    /// When the global "Other Income" category exists, the user also receives
    /// an opening transaction of the configured amount, in the same DB
    /// transaction as the user row.
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        validate_password(password)?;
        let full_name = normalize_optional_text(full_name);
        let password_hash = hash_password(password, self.password_cost).await?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(email));
            }

            let user_id = Uuid::new_v4();
            let model = users::ActiveModel {
                id: ActiveValue::Set(user_id),
                email: ActiveValue::Set(email.clone()),
                full_name: ActiveValue::Set(full_name),
                password_hash: ActiveValue::Set(password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            self.seed_opening_balance(&db_tx, user_id).await?;

            tracing::info!(user_id = %user_id, "user registered");
            Ok(User::from(model))
        })
    }

    async fn seed_opening_balance(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        let category = categories::Entity::find()
            .filter(categories::Column::UserId.is_null())
            .filter(categories::Column::Name.eq(OPENING_BALANCE_CATEGORY))
            .filter(categories::Column::CategoryType.eq(CategoryKind::Income.as_str()))
            .one(db_tx)
            .await?;
        let Some(category) = category else {
            tracing::warn!(
                user_id = %user_id,
                "global category {OPENING_BALANCE_CATEGORY:?} missing, no opening transaction"
            );
            return Ok(());
        };

        let tx = Transaction::new(
            user_id,
            category.id,
            OPENING_BALANCE_DESCRIPTION,
            self.initial_transaction_amount,
            None,
        )?;
        transactions::ActiveModel::from(&tx).insert(db_tx).await?;
        Ok(())
    }

    /// Check a user's credentials.
    ///
    /// Unknown emails and wrong passwords fail with the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        let Some(model) = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::InvalidCredentials);
        };

        if !verify_password(password, &model.password_hash).await? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(User::from(model))
    }

    /// Return the user registered with `email`.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or(EngineError::KeyNotFound(email))
    }
}
