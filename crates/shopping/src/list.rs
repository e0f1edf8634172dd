use foodgram_db::table::{Ingredient, RecipeIngredient, RecipeInShoppingCart};
use sea_query::{Alias, Expr, ExprTrait, Func, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

/// Total amount of one (ingredient, unit) across every recipe in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl super::Query {
    #[tracing::instrument(skip(self))]
    pub async fn aggregate(&self, user_id: i64) -> foodgram_shared::Result<Vec<ShoppingItem>> {
        let statement = sea_query::Query::select()
            .expr_as(
                Expr::col((Ingredient::Table, Ingredient::Name)),
                Alias::new("name"),
            )
            .expr_as(
                Expr::col((Ingredient::Table, Ingredient::MeasurementUnit)),
                Alias::new("measurement_unit"),
            )
            .expr_as(
                Func::sum(Expr::col((RecipeIngredient::Table, RecipeIngredient::Amount))),
                Alias::new("total_amount"),
            )
            .from(RecipeIngredient::Table)
            .inner_join(
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .inner_join(
                RecipeInShoppingCart::Table,
                Expr::col((RecipeInShoppingCart::Table, RecipeInShoppingCart::RecipeId))
                    .equals((RecipeIngredient::Table, RecipeIngredient::RecipeId)),
            )
            .and_where(
                Expr::col((RecipeInShoppingCart::Table, RecipeInShoppingCart::UserId)).eq(user_id),
            )
            .group_by_columns([
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .order_by((Ingredient::Table, Ingredient::Name), Order::Asc)
            .order_by((Ingredient::Table, Ingredient::MeasurementUnit), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShoppingItem, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Plain-text shopping list of `user_id`, empty when the cart is.
    pub async fn download(&self, user_id: i64) -> foodgram_shared::Result<String> {
        let items = self.aggregate(user_id).await?;

        Ok(render(&items))
    }
}

pub fn render(items: &[ShoppingItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}({}) — {}\n",
                item.name, item.measurement_unit, item.total_amount
            )
        })
        .collect()
}
