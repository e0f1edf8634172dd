use std::collections::HashMap;

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient};
use foodgram_shared::relation;
use foodgram_shopping::cart::Cart;
use foodgram_user::UserView;
use sea_query::{Alias, Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::{RecipeRow, command::recipe_columns, favorite::Favorite, tag::Tag};

mod author;
mod list;

pub use author::*;
pub use list::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct IngredientAmount {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Full recipe as returned by the API, flags are relative to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<IngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ShortRecipe {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

#[derive(FromRow)]
struct FlaggedRow {
    #[sqlx(flatten)]
    recipe: RecipeRow,
    is_favorited: bool,
    is_in_shopping_cart: bool,
}

pub async fn find(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<RecipeRow>> {
    let statement = Query::select()
        .columns(recipe_columns())
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub async fn short(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<ShortRecipe>> {
    let statement = Query::select()
        .columns([Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime])
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub async fn view(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Option<RecipeView>> {
    let statement = select_flagged(viewer)
        .and_where(Expr::col((Recipe::Table, Recipe::Id)).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, FlaggedRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(assemble(pool, rows, viewer).await?.into_iter().next())
}

fn select_flagged(viewer: Option<i64>) -> SelectStatement {
    Query::select()
        .columns(recipe_columns().map(|column| (Recipe::Table, column)))
        .expr_as(
            relation::exists_expr::<Favorite>(viewer),
            Alias::new("is_favorited"),
        )
        .expr_as(
            relation::exists_expr::<Cart>(viewer),
            Alias::new("is_in_shopping_cart"),
        )
        .from(Recipe::Table)
        .to_owned()
}

/// Joins tags, ingredient lines and authors onto the rows, keeping row order.
async fn assemble(
    pool: &SqlitePool,
    rows: Vec<FlaggedRow>,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Vec<RecipeView>> {
    let ids = rows.iter().map(|row| row.recipe.id).collect::<Vec<_>>();
    let author_ids = rows
        .iter()
        .map(|row| row.recipe.author_id)
        .collect::<Vec<_>>();

    let mut tags = HashMap::<i64, Vec<Tag>>::new();
    for (recipe_id, tag) in crate::tag::find_by_recipes(pool, &ids).await? {
        tags.entry(recipe_id).or_default().push(tag);
    }

    let mut lines = HashMap::<i64, Vec<IngredientAmount>>::new();
    for (recipe_id, line) in find_lines(pool, &ids).await? {
        lines.entry(recipe_id).or_default().push(line);
    }

    let authors = foodgram_user::views(pool, &author_ids, viewer).await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(author) = authors.get(&row.recipe.author_id).cloned() else {
            foodgram_shared::bail!(
                "author {} of recipe {} not found",
                row.recipe.author_id,
                row.recipe.id
            );
        };

        views.push(RecipeView {
            id: row.recipe.id,
            tags: tags.remove(&row.recipe.id).unwrap_or_default(),
            author,
            ingredients: lines.remove(&row.recipe.id).unwrap_or_default(),
            is_favorited: row.is_favorited,
            is_in_shopping_cart: row.is_in_shopping_cart,
            name: row.recipe.name,
            image: row.recipe.image,
            text: row.recipe.text,
            cooking_time: row.recipe.cooking_time,
        });
    }

    Ok(views)
}

/// Ingredient lines of each recipe in insertion order, as `(recipe_id, line)`.
async fn find_lines(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> foodgram_shared::Result<Vec<(i64, IngredientAmount)>> {
    #[derive(FromRow)]
    struct Row {
        recipe_id: i64,
        #[sqlx(flatten)]
        line: IngredientAmount,
    }

    if recipe_ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .column((RecipeIngredient::Table, RecipeIngredient::RecipeId))
        .columns([
            (Ingredient::Table, Ingredient::Id),
            (Ingredient::Table, Ingredient::Name),
            (Ingredient::Table, Ingredient::MeasurementUnit),
        ])
        .column((RecipeIngredient::Table, RecipeIngredient::Amount))
        .from(RecipeIngredient::Table)
        .inner_join(
            Ingredient::Table,
            Expr::col((Ingredient::Table, Ingredient::Id))
                .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
        )
        .and_where(
            Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                .is_in(recipe_ids.iter().copied()),
        )
        .order_by((RecipeIngredient::Table, RecipeIngredient::Id), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, Row, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| (row.recipe_id, row.line)).collect())
}
