use foodgram_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use super::RecipeInput;

impl super::Command {
    /// Replaces scalars, lines and tags. The stored image is kept when none is sent.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        request_by: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        super::ensure_owned(&mut tx, id, request_by).await?;

        input.validate()?;

        let image = input
            .image
            .as_deref()
            .map(crate::image::decode_data_uri)
            .transpose()?;

        super::ensure_ingredients_exist(&mut tx, &input.ingredients).await?;
        super::ensure_tags_exist(&mut tx, &input.tags).await?;

        let mut statement = Query::update()
            .table(Recipe::Table)
            .values([
                (Recipe::Name, input.name.into()),
                (Recipe::Text, input.text.into()),
                (Recipe::CookingTime, input.cooking_time.into()),
            ])
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        if let Some(image) = image {
            let reference = self.store_image(&image).await?;
            statement.value(Recipe::Image, reference);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        super::replace_ingredients(&mut tx, id, &input.ingredients).await?;
        super::replace_tags(&mut tx, id, &input.tags).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe updated");

        Ok(())
    }
}
