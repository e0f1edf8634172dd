//! Toggleable (subject, object) pairs: favorites, shopping cart entries and
//! author subscriptions all share the same add/remove semantics.

use sea_query::{Expr, ExprTrait, Iden, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{Constraint, Error, Result, State, violated_constraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RelationKind {
    Favorite,
    ShoppingCart,
    Subscription,
}

impl RelationKind {
    fn already_exists(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "Recipe is already in favorites",
            RelationKind::ShoppingCart => "Recipe is already in the shopping cart",
            RelationKind::Subscription => "You are already subscribed to this author",
        }
    }

    fn missing(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "Recipe is not in favorites",
            RelationKind::ShoppingCart => "Recipe is not in the shopping cart",
            RelationKind::Subscription => "You are not subscribed to this author",
        }
    }

    fn target_not_found(&self) -> &'static str {
        match self {
            RelationKind::Favorite | RelationKind::ShoppingCart => "Recipe not found",
            RelationKind::Subscription => "User not found",
        }
    }
}

/// Table layout of one relation kind.
pub trait Relation {
    type Iden: Iden + Clone + Send + Sync + 'static;
    type Target: Iden + Clone + Send + Sync + 'static;

    const KIND: RelationKind;
    /// Whether a subject may point at itself.
    const REFLEXIVE: bool = true;

    fn table() -> Self::Iden;
    fn subject() -> Self::Iden;
    fn object() -> Self::Iden;

    fn target_table() -> Self::Target;
    fn target_id() -> Self::Target;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub id: i64,
    pub subject_id: i64,
    pub object_id: i64,
}

#[tracing::instrument(skip(state), fields(kind = %R::KIND))]
pub async fn add<R: Relation>(state: &State, subject_id: i64, object_id: i64) -> Result<Pair> {
    if !R::REFLEXIVE && subject_id == object_id {
        tracing::debug!("reflexive relation rejected");

        return Err(Error::Conflict("You cannot subscribe to yourself".to_owned()));
    }

    let statement = Query::insert()
        .into_table(R::table())
        .columns([R::subject(), R::object()])
        .values_panic([subject_id.into(), object_id.into()])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = match sqlx::query_with(&sql, values)
        .execute(&state.write_db)
        .await
    {
        Ok(result) => result,
        Err(err) => {
            return match violated_constraint(&err) {
                Some(Constraint::Unique) => {
                    tracing::debug!("relation already exists");
                    Err(Error::Conflict(R::KIND.already_exists().to_owned()))
                }
                Some(Constraint::ForeignKey) => {
                    Err(Error::NotFound(R::KIND.target_not_found().to_owned()))
                }
                Some(Constraint::Check) => {
                    Err(Error::Conflict("You cannot subscribe to yourself".to_owned()))
                }
                None => Err(err.into()),
            };
        }
    };

    Ok(Pair {
        id: result.last_insert_rowid(),
        subject_id,
        object_id,
    })
}

#[tracing::instrument(skip(state), fields(kind = %R::KIND))]
pub async fn remove<R: Relation>(state: &State, subject_id: i64, object_id: i64) -> Result<()> {
    let statement = Query::delete()
        .from_table(R::table())
        .and_where(Expr::col(R::subject()).eq(subject_id))
        .and_where(Expr::col(R::object()).eq(object_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values)
        .execute(&state.write_db)
        .await?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    if !target_exists::<R>(&state.write_db, object_id).await? {
        return Err(Error::NotFound(R::KIND.target_not_found().to_owned()));
    }

    tracing::debug!("relation does not exist");

    Err(Error::Conflict(R::KIND.missing().to_owned()))
}

/// `EXISTS(pair(viewer, target.id))` for use inside a select over the target
/// table, constant false without a viewer.
pub fn exists_expr<R: Relation>(viewer: Option<i64>) -> Expr {
    let Some(viewer) = viewer else {
        return Expr::val(false);
    };

    Expr::exists(
        Query::select()
            .expr(Expr::val(1))
            .from(R::table())
            .and_where(Expr::col((R::table(), R::subject())).eq(viewer))
            .and_where(
                Expr::col((R::table(), R::object())).equals((R::target_table(), R::target_id())),
            )
            .to_owned(),
    )
}

pub async fn exists<R: Relation>(
    pool: &sqlx::SqlitePool,
    subject_id: i64,
    object_id: i64,
) -> Result<bool> {
    let statement = Query::select()
        .column(R::subject())
        .from(R::table())
        .and_where(Expr::col(R::subject()).eq(subject_id))
        .and_where(Expr::col(R::object()).eq(object_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_with(&sql, values).fetch_optional(pool).await?;

    Ok(row.is_some())
}

async fn target_exists<R: Relation>(pool: &sqlx::SqlitePool, object_id: i64) -> Result<bool> {
    let statement = Query::select()
        .column(R::target_id())
        .from(R::target_table())
        .and_where(Expr::col(R::target_id()).eq(object_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_with(&sql, values).fetch_optional(pool).await?;

    Ok(row.is_some())
}
