use foodgram_db::table::{Recipe, Tag, TagRecipe};
use foodgram_shared::{Page, PageArgs, relation};
use foodgram_shopping::cart::Cart;
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use super::{FlaggedRow, RecipeView};
use crate::favorite::Favorite;

#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    /// Tag slugs, a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Relation flags only an authenticated viewer can satisfy.
    fn requires_viewer(&self) -> bool {
        self.is_favorited == Some(true) || self.is_in_shopping_cart == Some(true)
    }

    fn apply(&self, statement: &mut SelectStatement, viewer: Option<i64>) {
        if let Some(author) = self.author {
            statement.and_where(Expr::col((Recipe::Table, Recipe::AuthorId)).eq(author));
        }

        if !self.tags.is_empty() {
            statement.and_where(Expr::exists(
                Query::select()
                    .expr(Expr::val(1))
                    .from(TagRecipe::Table)
                    .inner_join(
                        Tag::Table,
                        Expr::col((Tag::Table, Tag::Id)).equals((TagRecipe::Table, TagRecipe::TagId)),
                    )
                    .and_where(
                        Expr::col((TagRecipe::Table, TagRecipe::RecipeId))
                            .equals((Recipe::Table, Recipe::Id)),
                    )
                    .and_where(Expr::col((Tag::Table, Tag::Slug)).is_in(self.tags.iter().cloned()))
                    .to_owned(),
            ));
        }

        if viewer.is_none() {
            return;
        }

        match self.is_favorited {
            Some(true) => {
                statement.and_where(relation::exists_expr::<Favorite>(viewer));
            }
            Some(false) => {
                statement.and_where(relation::exists_expr::<Favorite>(viewer).not());
            }
            None => {}
        }

        match self.is_in_shopping_cart {
            Some(true) => {
                statement.and_where(relation::exists_expr::<Cart>(viewer));
            }
            Some(false) => {
                statement.and_where(relation::exists_expr::<Cart>(viewer).not());
            }
            None => {}
        }
    }
}

/// Filtered recipes, newest first.
#[tracing::instrument(skip(pool))]
pub async fn list(
    pool: &SqlitePool,
    filter: RecipeFilter,
    args: PageArgs,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Page<RecipeView>> {
    if viewer.is_none() && filter.requires_viewer() {
        args.ensure_in_range(0)?;

        return Ok(Page::empty());
    }

    let mut statement = Query::select()
        .expr(Func::count(Expr::col((Recipe::Table, Recipe::Id))))
        .from(Recipe::Table)
        .to_owned();
    filter.apply(&mut statement, viewer);

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;
    let count = count as u64;

    args.ensure_in_range(count)?;

    let mut statement = super::select_flagged(viewer);
    filter.apply(&mut statement, viewer);
    statement
        .order_by((Recipe::Table, Recipe::PubDate), Order::Desc)
        .order_by((Recipe::Table, Recipe::Id), Order::Desc)
        .limit(args.size())
        .offset(args.offset());

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, FlaggedRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    let results = super::assemble(pool, rows, viewer).await?;

    Ok(Page::new(&args, count, results))
}
