use foodgram_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::{path::PathBuf, str::FromStr};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
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

pub async fn create_user(state: &State, name: &str) -> anyhow::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO user (email, username, password, created_at) VALUES (?, ?, 'x', 0)",
    )
    .bind(format!("{name}@foodgram.localhost"))
    .bind(name)
    .execute(&state.write_db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn create_ingredient(state: &State, name: &str, unit: &str) -> anyhow::Result<i64> {
    let result = sqlx::query("INSERT INTO ingredient (name, measurement_unit) VALUES (?, ?)")
        .bind(name)
        .bind(unit)
        .execute(&state.write_db)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Inserts a recipe row with its lines directly, bypassing validation.
pub async fn create_recipe(
    state: &State,
    author_id: i64,
    lines: &[(i64, i64)],
) -> anyhow::Result<i64> {
    let id = sqlx::query(
        "INSERT INTO recipe (author_id, name, image, text, cooking_time, pub_date) VALUES (?, 'r', 'r.png', 't', 5, 0)",
    )
    .bind(author_id)
    .execute(&state.write_db)
    .await?
    .last_insert_rowid();

    for (ingredient_id, amount) in lines {
        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
        )
        .bind(id)
        .bind(ingredient_id)
        .bind(amount)
        .execute(&state.write_db)
        .await?;
    }

    Ok(id)
}
