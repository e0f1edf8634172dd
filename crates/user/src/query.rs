use std::collections::HashMap;

use foodgram_db::table::{Subscription, User};
use foodgram_shared::{Page, PageArgs, relation};
use sea_query::{Alias, Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::{
    UserRow, password,
    repository::{self, FindType},
    subscription::Follow,
};

/// Public representation of a user as seen by `viewer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<UserRow>> {
    repository::find(pool, FindType::Id(id)).await
}

pub async fn find_by_email(
    pool: &SqlitePool,
    email: impl Into<String>,
) -> foodgram_shared::Result<Option<UserRow>> {
    repository::find(pool, FindType::Email(email.into())).await
}

/// Looks the user up by email and checks the password, `None` on any mismatch.
pub async fn verify_credentials(
    pool: &SqlitePool,
    email: impl Into<String>,
    password: &str,
) -> foodgram_shared::Result<Option<UserRow>> {
    let Some(user) = find_by_email(pool, email).await? else {
        return Ok(None);
    };

    if !password::verify_password(password, &user.password) {
        return Ok(None);
    }

    Ok(Some(user))
}

fn select_views(viewer: Option<i64>) -> SelectStatement {
    Query::select()
        .columns([
            (User::Table, User::Email),
            (User::Table, User::Id),
            (User::Table, User::Username),
            (User::Table, User::FirstName),
            (User::Table, User::LastName),
        ])
        .expr_as(
            relation::exists_expr::<Follow>(viewer),
            Alias::new("is_subscribed"),
        )
        .from(User::Table)
        .to_owned()
}

pub async fn view(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Option<UserView>> {
    let statement = select_views(viewer)
        .and_where(Expr::col((User::Table, User::Id)).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Batch variant of [`view`] keyed by user id, unknown ids are skipped.
pub async fn views(
    pool: &SqlitePool,
    ids: &[i64],
    viewer: Option<i64>,
) -> foodgram_shared::Result<HashMap<i64, UserView>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let statement = select_views(viewer)
        .and_where(Expr::col((User::Table, User::Id)).is_in(ids.iter().copied()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, UserView, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| (row.id, row)).collect())
}

/// Authors followed by `viewer`, ordered by id.
#[tracing::instrument(skip(pool))]
pub async fn subscriptions(
    pool: &SqlitePool,
    viewer: i64,
    args: PageArgs,
) -> foodgram_shared::Result<Page<UserView>> {
    let followed = Query::select()
        .column(Subscription::AuthorId)
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::UserId).eq(viewer))
        .to_owned();

    let statement = Query::select()
        .expr(Func::count(Expr::col(Subscription::Id)))
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::UserId).eq(viewer))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;
    let count = count as u64;

    args.ensure_in_range(count)?;

    let statement = select_views(Some(viewer))
        .and_where(Expr::col((User::Table, User::Id)).in_subquery(followed))
        .order_by((User::Table, User::Id), Order::Asc)
        .limit(args.size())
        .offset(args.offset())
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let results = sqlx::query_as_with::<_, UserView, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(Page::new(&args, count, results))
}
