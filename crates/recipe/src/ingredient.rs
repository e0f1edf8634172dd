use foodgram_db::table::Ingredient as IngredientTable;
use foodgram_shared::{Constraint, State, violated_constraint};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, prelude::FromRow};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

#[tracing::instrument(skip(state))]
pub async fn create(state: &State, input: CreateInput) -> foodgram_shared::Result<Ingredient> {
    input.validate()?;

    let statement = Query::insert()
        .into_table(IngredientTable::Table)
        .columns([IngredientTable::Name, IngredientTable::MeasurementUnit])
        .values_panic([
            input.name.as_str().into(),
            input.measurement_unit.as_str().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let id = match sqlx::query_with(&sql, values).execute(&state.write_db).await {
        Ok(result) => result.last_insert_rowid(),
        Err(err) if violated_constraint(&err) == Some(Constraint::Unique) => {
            foodgram_shared::conflict!(
                "Ingredient {} ({}) already exists",
                input.name,
                input.measurement_unit
            );
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Ingredient {
        id,
        name: input.name,
        measurement_unit: input.measurement_unit,
    })
}

/// Name prefix search through `LIKE`, which ignores case for ASCII letters only.
/// Every ingredient is returned when `prefix` is empty.
pub async fn search(pool: &SqlitePool, prefix: &str) -> foodgram_shared::Result<Vec<Ingredient>> {
    let mut statement = Query::select()
        .columns([
            IngredientTable::Id,
            IngredientTable::Name,
            IngredientTable::MeasurementUnit,
        ])
        .from(IngredientTable::Table)
        .order_by(IngredientTable::Name, Order::Asc)
        .order_by(IngredientTable::MeasurementUnit, Order::Asc)
        .to_owned();

    let prefix = prefix.trim();
    if !prefix.is_empty() {
        let pattern = format!(
            "{}%",
            prefix
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );
        statement.and_where(
            Expr::col(IngredientTable::Name)
                .like(sea_query::LikeExpr::new(pattern).escape('\\')),
        );
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn find(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<Ingredient>> {
    let statement = Query::select()
        .columns([
            IngredientTable::Id,
            IngredientTable::Name,
            IngredientTable::MeasurementUnit,
        ])
        .from(IngredientTable::Table)
        .and_where(Expr::col(IngredientTable::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

#[tracing::instrument(skip(state))]
pub async fn delete(state: &State, id: i64) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(IngredientTable::Table)
        .and_where(Expr::col(IngredientTable::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = match sqlx::query_with(&sql, values).execute(&state.write_db).await {
        Ok(result) => result,
        Err(err) if violated_constraint(&err) == Some(Constraint::ForeignKey) => {
            foodgram_shared::conflict!("Ingredient is used by recipes");
        }
        Err(err) => return Err(err.into()),
    };

    if result.rows_affected() == 0 {
        foodgram_shared::not_found!("Ingredient not found");
    }

    Ok(())
}
