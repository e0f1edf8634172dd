use foodgram_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64, request_by: i64) -> foodgram_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        super::ensure_owned(&mut tx, id, request_by).await?;

        let statement = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe deleted");

        Ok(())
    }
}
