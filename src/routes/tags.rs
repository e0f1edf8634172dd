use axum::{Json, extract::State};
use foodgram_recipe::tag::{self, Tag};

use super::{AppState, Path};
use crate::error::ApiError;

pub async fn list(State(app): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(tag::list(&app.read_db).await?))
}

pub async fn detail(
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    tag::find(&app.read_db, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
