use foodgram_db::table::{Tag as TagTable, TagRecipe};
use foodgram_shared::{Constraint, State, violated_constraint};
use regex::Regex;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, prelude::FromRow};
use std::sync::LazyLock;
use validator::Validate;

static RE_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[a-fA-F0-9]{6}$").unwrap());
static RE_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(regex(path = *RE_COLOR, message = "Color must be a hex code like #49B64E."))]
    pub color: String,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *RE_SLUG, message = "Only letters, digits, '-' and '_' are allowed.")
    )]
    pub slug: String,
}

#[tracing::instrument(skip(state))]
pub async fn create(state: &State, input: CreateInput) -> foodgram_shared::Result<Tag> {
    input.validate()?;

    let statement = Query::insert()
        .into_table(TagTable::Table)
        .columns([TagTable::Name, TagTable::Color, TagTable::Slug])
        .values_panic([
            input.name.as_str().into(),
            input.color.as_str().into(),
            input.slug.as_str().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let id = match sqlx::query_with(&sql, values).execute(&state.write_db).await {
        Ok(result) => result.last_insert_rowid(),
        Err(err) if violated_constraint(&err) == Some(Constraint::Unique) => {
            foodgram_shared::conflict!("Tag with this name, color or slug already exists");
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Tag {
        id,
        name: input.name,
        color: input.color,
        slug: input.slug,
    })
}

pub async fn list(pool: &SqlitePool) -> foodgram_shared::Result<Vec<Tag>> {
    let statement = Query::select()
        .columns([TagTable::Id, TagTable::Name, TagTable::Color, TagTable::Slug])
        .from(TagTable::Table)
        .order_by(TagTable::Name, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn find(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<Tag>> {
    let statement = Query::select()
        .columns([TagTable::Id, TagTable::Name, TagTable::Color, TagTable::Slug])
        .from(TagTable::Table)
        .and_where(Expr::col(TagTable::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Tags of each recipe in `recipe_ids`, as `(recipe_id, tag)` ordered by tag name.
pub(crate) async fn find_by_recipes(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> foodgram_shared::Result<Vec<(i64, Tag)>> {
    #[derive(FromRow)]
    struct Row {
        recipe_id: i64,
        #[sqlx(flatten)]
        tag: Tag,
    }

    if recipe_ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .column((TagRecipe::Table, TagRecipe::RecipeId))
        .columns([
            (TagTable::Table, TagTable::Id),
            (TagTable::Table, TagTable::Name),
            (TagTable::Table, TagTable::Color),
            (TagTable::Table, TagTable::Slug),
        ])
        .from(TagRecipe::Table)
        .inner_join(
            TagTable::Table,
            Expr::col((TagTable::Table, TagTable::Id)).equals((TagRecipe::Table, TagRecipe::TagId)),
        )
        .and_where(
            Expr::col((TagRecipe::Table, TagRecipe::RecipeId)).is_in(recipe_ids.iter().copied()),
        )
        .order_by((TagTable::Table, TagTable::Name), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, Row, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| (row.recipe_id, row.tag)).collect())
}

/// Fails with a conflict while any recipe still references the tag.
#[tracing::instrument(skip(state))]
pub async fn delete(state: &State, id: i64) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(TagTable::Table)
        .and_where(Expr::col(TagTable::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = match sqlx::query_with(&sql, values).execute(&state.write_db).await {
        Ok(result) => result,
        Err(err) if violated_constraint(&err) == Some(Constraint::ForeignKey) => {
            foodgram_shared::conflict!("Tag is used by recipes");
        }
        Err(err) => return Err(err.into()),
    };

    if result.rows_affected() == 0 {
        foodgram_shared::not_found!("Tag not found");
    }

    Ok(())
}
