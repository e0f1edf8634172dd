use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use foodgram_shared::{Page, PageArgs};
use foodgram_user::{RegisterInput, UserView};
use serde::Deserialize;

use super::{AppState, JsonBody, Path, Query};
use crate::{
    auth::{AuthUser, MaybeUser},
    error::ApiError,
    query::UserWithRecipes,
};

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimit {
    recipes_limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    page: Option<u64>,
    limit: Option<u64>,
    recipes_limit: Option<u64>,
}

async fn load_view(app: &AppState, id: i64, viewer: Option<i64>) -> Result<UserView, ApiError> {
    foodgram_user::view(&app.read_db, id, viewer)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn register(
    State(app): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app.user_command.register(input).await?;

    Ok((StatusCode::CREATED, Json(load_view(&app, id, None).await?)))
}

pub async fn me(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(load_view(&app, user_id, Some(user_id)).await?))
}

pub async fn detail(
    State(app): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(load_view(&app, id, viewer).await?))
}

pub async fn subscriptions(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<Page<UserWithRecipes>>, ApiError> {
    let args = PageArgs {
        page: params.page,
        limit: params.limit,
    };
    let page =
        crate::query::subscriptions(&app.read_db, user_id, args, params.recipes_limit).await?;

    Ok(Json(page.map(|user| app.user_with_recipes(user))))
}

pub async fn subscribe(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<RecipesLimit>,
) -> Result<impl IntoResponse, ApiError> {
    app.user_command.subscribe(user_id, id).await?;

    let author =
        crate::query::user_with_recipes(&app.read_db, id, Some(user_id), params.recipes_limit)
            .await?
            .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(app.user_with_recipes(author))))
}

pub async fn unsubscribe(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app.user_command.unsubscribe(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
