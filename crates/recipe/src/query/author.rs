use foodgram_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Func, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use super::ShortRecipe;

/// Newest recipes of an author, capped by `limit` when given.
pub async fn short_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: Option<u64>,
) -> foodgram_shared::Result<Vec<ShortRecipe>> {
    let mut statement = Query::select()
        .columns([Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime])
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
        .order_by(Recipe::PubDate, Order::Desc)
        .order_by(Recipe::Id, Order::Desc)
        .to_owned();

    // SQLite binds LIMIT as a signed integer
    if let Some(limit) = limit {
        statement.limit(Ord::min(limit, i64::MAX as u64));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> foodgram_shared::Result<u64> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(Recipe::Id)))
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(count as u64)
}
