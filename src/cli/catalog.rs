use foodgram::config::Config;
use foodgram_recipe::{ingredient, tag};

use super::user::open_state;

pub async fn create_tag(config: Config, input: tag::CreateInput) -> anyhow::Result<()> {
    let state = open_state(&config).await?;
    let tag = tag::create(&state, input).await?;

    tracing::info!(id = tag.id, slug = %tag.slug, "tag created");
    state.write_db.close().await;

    Ok(())
}

pub async fn create_ingredient(
    config: Config,
    input: ingredient::CreateInput,
) -> anyhow::Result<()> {
    let state = open_state(&config).await?;
    let ingredient = ingredient::create(&state, input).await?;

    tracing::info!(id = ingredient.id, name = %ingredient.name, "ingredient created");
    state.write_db.close().await;

    Ok(())
}
