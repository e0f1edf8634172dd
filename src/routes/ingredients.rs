use axum::{Json, extract::State};
use foodgram_recipe::ingredient::{self, Ingredient};
use serde::Deserialize;

use super::{AppState, Path, Query};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default, alias = "search")]
    name: Option<String>,
}

/// Case-insensitive name prefix search, unpaginated.
pub async fn search(
    State(app): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let prefix = params.name.unwrap_or_default();

    Ok(Json(ingredient::search(&app.read_db, prefix.trim()).await?))
}

pub async fn detail(
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, ApiError> {
    ingredient::find(&app.read_db, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
