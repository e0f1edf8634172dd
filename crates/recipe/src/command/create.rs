use foodgram_db::table::Recipe;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use super::RecipeInput;

impl super::Command {
    /// Creates the recipe with its ingredient lines and tags in one transaction.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, author_id: i64, input: RecipeInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let Some(image) = input.image.as_deref() else {
            foodgram_shared::invalid!("image", "This field is required.");
        };
        let image = crate::image::decode_data_uri(image)?;

        let mut tx = self.write_db.begin().await?;

        super::ensure_ingredients_exist(&mut tx, &input.ingredients).await?;
        super::ensure_tags_exist(&mut tx, &input.tags).await?;

        let image = self.store_image(&image).await?;
        let pub_date = foodgram_shared::now()?;

        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Image,
                Recipe::Text,
                Recipe::CookingTime,
                Recipe::PubDate,
            ])
            .values_panic([
                author_id.into(),
                input.name.into(),
                image.into(),
                input.text.into(),
                input.cooking_time.into(),
                pub_date.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        super::replace_ingredients(&mut tx, id, &input.ingredients).await?;
        super::replace_tags(&mut tx, id, &input.tags).await?;

        tx.commit().await?;

        tracing::info!(recipe_id = id, author_id, "recipe created");

        Ok(id)
    }
}
