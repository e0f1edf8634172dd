use std::{collections::HashSet, ops::Deref, sync::Arc};

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient, Tag, TagRecipe};
use foodgram_shared::State;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::{Validate, ValidationError};

use crate::image::{DecodedImage, ImageStore};

mod create;
mod delete;
mod update;

/// One `(ingredient, amount)` line of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IngredientLine {
    pub id: i64,
    #[validate(range(min = 1, max = 1000))]
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Base64 data URI, required on create and optional on update.
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = 1440))]
    pub cooking_time: i64,
    #[validate(
        length(min = 1, message = "At least one ingredient is required."),
        nested,
        custom(function = "unique_ingredients")
    )]
    pub ingredients: Vec<IngredientLine>,
    #[validate(
        length(min = 1, message = "At least one tag is required."),
        custom(function = "unique_tags")
    )]
    pub tags: Vec<i64>,
}

fn unique_ingredients(lines: &[IngredientLine]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if lines.iter().all(|line| seen.insert(line.id)) {
        return Ok(());
    }

    Err(ValidationError::new("unique").with_message("Ingredients must not repeat.".into()))
}

fn unique_tags(tags: &[i64]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if tags.iter().all(|id| seen.insert(*id)) {
        return Ok(());
    }

    Err(ValidationError::new("unique").with_message("Tags must not repeat.".into()))
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: i64,
}

#[derive(Clone)]
pub struct Command {
    state: State,
    images: Arc<dyn ImageStore>,
    pub favorite: crate::favorite::Command,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, images: Arc<dyn ImageStore>) -> Self {
        Self {
            favorite: crate::favorite::Command(state.clone()),
            images,
            state,
        }
    }

    pub async fn load(&self, id: i64) -> foodgram_shared::Result<Option<RecipeRow>> {
        crate::find(&self.read_db, id).await
    }

    async fn store_image(&self, image: &DecodedImage) -> foodgram_shared::Result<String> {
        let name = image.file_name();
        let reference = self.images.save(&name, &image.bytes).await?;
        tracing::debug!(%reference, "recipe image stored");

        Ok(reference)
    }
}

/// Checks `request_by` authored the recipe, on the connection the write runs on.
async fn ensure_owned(
    conn: &mut SqliteConnection,
    id: i64,
    request_by: i64,
) -> foodgram_shared::Result<()> {
    let statement = Query::select()
        .column(Recipe::AuthorId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let Some((author_id,)) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?
    else {
        foodgram_shared::not_found!("Recipe not found");
    };

    if author_id != request_by {
        foodgram_shared::forbidden!("Only the author can change this recipe");
    }

    Ok(())
}

async fn ensure_ingredients_exist(
    conn: &mut SqliteConnection,
    lines: &[IngredientLine],
) -> foodgram_shared::Result<()> {
    let ids = lines.iter().map(|line| line.id).collect::<Vec<_>>();
    let statement = Query::select()
        .column(Ingredient::Id)
        .from(Ingredient::Table)
        .and_where(Expr::col(Ingredient::Id).is_in(ids.iter().copied()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect::<HashSet<_>>();

    if let Some(id) = ids.iter().find(|id| !found.contains(id)) {
        foodgram_shared::invalid!("ingredients", "Ingredient {id} does not exist");
    }

    Ok(())
}

async fn ensure_tags_exist(conn: &mut SqliteConnection, ids: &[i64]) -> foodgram_shared::Result<()> {
    let statement = Query::select()
        .column(Tag::Id)
        .from(Tag::Table)
        .and_where(Expr::col(Tag::Id).is_in(ids.iter().copied()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect::<HashSet<_>>();

    if let Some(id) = ids.iter().find(|id| !found.contains(id)) {
        foodgram_shared::invalid!("tags", "Tag {id} does not exist");
    }

    Ok(())
}

async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    lines: &[IngredientLine],
) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(RecipeIngredient::Table)
        .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if lines.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for line in lines {
        statement.values_panic([recipe_id.into(), line.id.into(), line.amount.into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

async fn replace_tags(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tags: &[i64],
) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(TagRecipe::Table)
        .and_where(Expr::col(TagRecipe::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if tags.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(TagRecipe::Table)
        .columns([TagRecipe::TagId, TagRecipe::RecipeId])
        .to_owned();

    for tag_id in tags {
        statement.values_panic([(*tag_id).into(), recipe_id.into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

pub(crate) fn recipe_columns() -> [Recipe; 7] {
    [
        Recipe::Id,
        Recipe::AuthorId,
        Recipe::Name,
        Recipe::Image,
        Recipe::Text,
        Recipe::CookingTime,
        Recipe::PubDate,
    ]
}
