//! Transaction primitives.
//!
//! A `Transaction` records one movement of money for a user. It carries no
//! type of its own: its effective type is the type of its category, which is
//! why most reads return a [`TransactionRecord`] joined with the category.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    CategoryKind, EngineError, MoneyCents, ResultEngine, categories,
    util::{validate_amount, validate_description},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub last_changed: DateTime<Utc>,
}

impl Transaction {
    /// Build a new validated transaction.
    ///
    /// `date` defaults to the current UTC date.
    pub fn new(
        user_id: Uuid,
        category_id: Uuid,
        description: &str,
        amount: MoneyCents,
        date: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        let description = validate_description(description)?;
        validate_amount(amount)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            description,
            amount,
            date: date.unwrap_or_else(|| now.date_naive()),
            last_changed: now,
        })
    }
}

/// A transaction flattened with the name and type of its category.
///
/// This is the input of the aggregation in [`crate::summary`] and the shape
/// returned by every transaction read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_kind: CategoryKind,
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub last_changed: DateTime<Utc>,
}

impl TransactionRecord {
    pub(crate) fn from_models(
        model: Model,
        category: Option<categories::Model>,
    ) -> ResultEngine<Self> {
        let Some(category) = category else {
            return Err(EngineError::UnresolvedCategory(model.id.to_string()));
        };
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            category_kind: CategoryKind::try_from(category.category_type.as_str())?,
            category_name: category.name,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            date: model.date,
            last_changed: model.last_changed,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub date: Date,
    pub last_changed: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id),
            category_id: ActiveValue::Set(tx.category_id),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            date: ActiveValue::Set(tx.date),
            last_changed: ActiveValue::Set(tx.last_changed),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            date: model.date,
            last_changed: model.last_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_date_to_today() {
        let tx = Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            " Groceries ",
            MoneyCents::new(1250),
            None,
        )
        .unwrap();
        assert_eq!(tx.description, "Groceries");
        assert_eq!(tx.date, tx.last_changed.date_naive());
    }

    #[test]
    fn new_rejects_negative_amount_and_empty_description() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        assert!(matches!(
            Transaction::new(user, category, "Refund", MoneyCents::new(-1), None),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            Transaction::new(user, category, "   ", MoneyCents::new(1), None),
            Err(EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn record_without_category_is_an_error() {
        let model = Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            description: "Lost".to_string(),
            amount_minor: 100,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            last_changed: Utc::now(),
        };
        let id = model.id;
        assert_eq!(
            TransactionRecord::from_models(model, None),
            Err(EngineError::UnresolvedCategory(id.to_string()))
        );
    }
}
