//! Seed the global categories every user can see.

use chrono::Utc;
use sea_orm_migration::prelude::*;
use uuid::Uuid;

use super::m20240601_000001_init::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INCOME: &[&str] = &[
    "Salary",
    "Freelancing",
    "Investment Returns",
    "Rental Income",
    "Business Income",
    "Other Income",
];

const EXPENSE: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Housing",
    "Insurance",
    "Other Expenses",
];

fn seeds() -> impl Iterator<Item = (&'static str, &'static str)> {
    INCOME
        .iter()
        .map(|name| (*name, "income"))
        .chain(EXPENSE.iter().map(|name| (*name, "expense")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();
        let mut insert = Query::insert();
        insert.into_table(Categories::Table).columns([
            Categories::Id,
            Categories::Name,
            Categories::CategoryType,
            Categories::LastChanged,
        ]);
        for (name, kind) in seeds() {
            insert
                .values([
                    Uuid::new_v4().into(),
                    name.into(),
                    kind.into(),
                    now.into(),
                ])
                .map_err(|err| DbErr::Migration(err.to_string()))?;
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = seeds().map(|(name, _)| name).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Categories::Table)
                    .and_where(Expr::col(Categories::UserId).is_null())
                    .and_where(Expr::col(Categories::Name).is_in(names))
                    .to_owned(),
            )
            .await
    }
}
