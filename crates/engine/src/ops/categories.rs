use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, EngineError, ResultEngine, categories, transactions,
    util::validate_category_name,
};

use super::{Engine, with_tx};

/// Categories `user_id` can see: the global ones plus, for a known user, its
/// own.
fn visibility(user_id: Option<Uuid>) -> Condition {
    let condition = Condition::any().add(categories::Column::UserId.is_null());
    match user_id {
        Some(user_id) => condition.add(categories::Column::UserId.eq(user_id)),
        None => condition,
    }
}

impl Engine {
    /// Lists the categories visible to `user_id`, ordered by name.
    ///
    /// Anonymous callers (`None`) only see global categories.
    pub async fn list_categories(
        &self,
        user_id: Option<Uuid>,
        kind: Option<CategoryKind>,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().filter(visibility(user_id));
        if let Some(kind) = kind {
            query = query.filter(categories::Column::CategoryType.eq(kind.as_str()));
        }
        query
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Return a category visible to `user_id`.
    pub async fn category(&self, id: Uuid, user_id: Option<Uuid>) -> ResultEngine<Category> {
        categories::Entity::find_by_id(id)
            .filter(visibility(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("category {id}")))
            .and_then(Category::try_from)
    }

    pub async fn create_category(
        &self,
        user_id: Uuid,
        name: &str,
        kind: CategoryKind,
    ) -> ResultEngine<Category> {
        let name = validate_category_name(name)?;
        let category = Category::new(name, kind, Some(user_id));
        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        tracing::debug!(category_id = %category.id, user_id = %user_id, "category created");
        Ok(category)
    }

    /// Rename a category owned by `user_id`.
    ///
    /// The type of a category never changes: asking for a different one is a
    /// validation error, asking for the same one is accepted.
    pub async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        kind: Option<CategoryKind>,
    ) -> ResultEngine<Category> {
        let name = name.map(validate_category_name).transpose()?;
        with_tx!(self, |db_tx| {
            let model = require_owned_category(&db_tx, id, user_id).await?;
            let mut category = Category::try_from(model)?;

            if let Some(kind) = kind
                && kind != category.kind
            {
                return Err(EngineError::InvalidQuery(
                    "category type cannot be changed".to_string(),
                ));
            }

            if let Some(name) = name {
                category.name = name;
                category.last_changed = Utc::now();
                categories::ActiveModel {
                    id: ActiveValue::Unchanged(category.id),
                    name: ActiveValue::Set(category.name.clone()),
                    last_changed: ActiveValue::Set(category.last_changed),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }
            Ok(category)
        })
    }

    /// Delete a category owned by `user_id`.
    ///
    /// A category still referenced by transactions cannot be deleted.
    pub async fn delete_category(&self, user_id: Uuid, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_owned_category(&db_tx, id, user_id).await?;
            let in_use = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(model.id))
                .count(&db_tx)
                .await?;
            if in_use > 0 {
                return Err(EngineError::CategoryInUse(format!(
                    "category '{}' is used by {in_use} transactions",
                    model.name
                )));
            }
            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

/// Load a category and check `user_id` may modify it.
///
/// Global categories and the ones of other users are forbidden; unknown ids
/// are not found.
async fn require_owned_category<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    user_id: Uuid,
) -> ResultEngine<categories::Model> {
    let Some(model) = categories::Entity::find_by_id(id).one(db).await? else {
        return Err(EngineError::KeyNotFound(format!("category {id}")));
    };
    if model.user_id != Some(user_id) {
        return Err(EngineError::Forbidden(
            "not enough permissions to modify this category".to_string(),
        ));
    }
    Ok(model)
}

/// Load a category `user_id` can attach transactions to.
pub(super) async fn usable_category<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    user_id: Uuid,
) -> ResultEngine<categories::Model> {
    categories::Entity::find_by_id(id)
        .filter(visibility(Some(user_id)))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::InvalidCategory(format!("category {id} not found")))
}
