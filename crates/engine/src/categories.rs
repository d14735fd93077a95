//! Income/expense categories.
//!
//! A category without an owner (`user_id` is null) is *global* and visible to
//! every user; the others belong to exactly one user.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Global income category that receives the opening transaction of every new
/// user.
pub const OPENING_BALANCE_CATEGORY: &str = "Other Income";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidQuery(format!(
                "invalid category type: {other}"
            ))),
        }
    }
}

/// A category as seen by callers of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    /// Owner of the category, `None` for global ones.
    pub user_id: Option<Uuid>,
    pub last_changed: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, kind: CategoryKind, user_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            user_id,
            last_changed: Utc::now(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether `user_id` may reference this category in a transaction.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.user_id.is_none_or(|owner| owner == user_id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category_type: String,
    pub user_id: Option<Uuid>,
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
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id),
            name: ActiveValue::Set(category.name.clone()),
            category_type: ActiveValue::Set(category.kind.as_str().to_string()),
            user_id: ActiveValue::Set(category.user_id),
            last_changed: ActiveValue::Set(category.last_changed),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            kind: CategoryKind::try_from(model.category_type.as_str())?,
            name: model.name,
            user_id: model.user_id,
            last_changed: model.last_changed,
        })
    }
}
