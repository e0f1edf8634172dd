use base64::{Engine, engine::general_purpose::STANDARD};
use foodgram_recipe::{IngredientLine, RecipeInput, image::FsImageStore};
use foodgram_shared::State;
use foodgram_user::RegisterInput;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::{io::Cursor, path::Path, str::FromStr, sync::Arc};

pub async fn setup_test_state(dir: &Path) -> anyhow::Result<State> {
    let path = dir.join("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(State {
        read_db: pool.clone(),
        write_db: pool,
    })
}

#[allow(dead_code)]
pub fn command(state: &State, dir: &Path) -> foodgram_recipe::Command {
    foodgram_recipe::Command::new(
        state.clone(),
        Arc::new(FsImageStore::new(dir.join("media"))),
    )
}

#[allow(dead_code)]
pub async fn create_user(state: &State, name: &str) -> anyhow::Result<i64> {
    Ok(foodgram_user::Command::new(state.clone())
        .register(RegisterInput {
            email: format!("{name}@foodgram.localhost"),
            username: name.to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?)
}

#[allow(dead_code)]
pub async fn create_tag(state: &State, slug: &str) -> anyhow::Result<i64> {
    let tag = foodgram_recipe::tag::create(
        state,
        foodgram_recipe::tag::CreateInput {
            name: slug.to_uppercase(),
            color: format!(
                "#{:06x}",
                slug.bytes()
                    .fold(7u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
                    & 0xFFFFFF
            ),
            slug: slug.to_owned(),
        },
    )
    .await?;

    Ok(tag.id)
}

#[allow(dead_code)]
pub async fn create_ingredient(state: &State, name: &str, unit: &str) -> anyhow::Result<i64> {
    let ingredient = foodgram_recipe::ingredient::create(
        state,
        foodgram_recipe::ingredient::CreateInput {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        },
    )
    .await?;

    Ok(ingredient.id)
}

#[allow(dead_code)]
pub fn image_data_uri() -> String {
    let mut bytes = Cursor::new(vec![]);
    image::RgbImage::new(1, 1)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();

    format!("data:image/png;base64,{}", STANDARD.encode(bytes.into_inner()))
}

#[allow(dead_code)]
pub fn recipe_input(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> RecipeInput {
    RecipeInput {
        name: name.to_owned(),
        image: Some(image_data_uri()),
        text: "Mix everything.".to_owned(),
        cooking_time: 10,
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientLine {
                id: *id,
                amount: *amount,
            })
            .collect(),
        tags: tags.to_vec(),
    }
}
