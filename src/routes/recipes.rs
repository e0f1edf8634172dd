use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use foodgram_recipe::{RecipeFilter, RecipeInput, RecipeView, ShortRecipe};
use foodgram_shared::{Page, PageArgs};
use foodgram_shopping::SHOPPING_LIST_FILE_NAME;
use serde::Deserialize;

use super::{AppState, JsonBody, Path, Query};
use crate::{
    auth::{AuthUser, MaybeUser},
    error::ApiError,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<u64>,
    limit: Option<u64>,
    author: Option<i64>,
    #[serde(default)]
    tags: Vec<String>,
    is_favorited: Option<u8>,
    is_in_shopping_cart: Option<u8>,
}

impl ListParams {
    fn into_parts(self) -> (RecipeFilter, PageArgs) {
        let filter = RecipeFilter {
            author: self.author,
            tags: self.tags,
            is_favorited: self.is_favorited.map(|flag| flag != 0),
            is_in_shopping_cart: self.is_in_shopping_cart.map(|flag| flag != 0),
        };

        (
            filter,
            PageArgs {
                page: self.page,
                limit: self.limit,
            },
        )
    }
}

async fn load_view(app: &AppState, id: i64, viewer: Option<i64>) -> Result<RecipeView, ApiError> {
    let view = foodgram_recipe::view(&app.read_db, id, viewer)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(app.recipe_view(view))
}

async fn load_short(app: &AppState, id: i64) -> Result<ShortRecipe, ApiError> {
    let recipe = foodgram_recipe::short(&app.read_db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(app.short_recipe(recipe))
}

pub async fn list(
    State(app): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<RecipeView>>, ApiError> {
    let (filter, args) = params.into_parts();
    let page = foodgram_recipe::list(&app.read_db, filter, args, viewer).await?;

    Ok(Json(page.map(|recipe| app.recipe_view(recipe))))
}

pub async fn create(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(input): JsonBody<RecipeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app.recipe_command.create(user_id, input).await?;
    let view = load_view(&app, id, Some(user_id)).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn detail(
    State(app): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeView>, ApiError> {
    Ok(Json(load_view(&app, id, viewer).await?))
}

pub async fn update(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<RecipeInput>,
) -> Result<Json<RecipeView>, ApiError> {
    app.recipe_command.update(id, user_id, input).await?;

    Ok(Json(load_view(&app, id, Some(user_id)).await?))
}

pub async fn delete(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app.recipe_command.delete(id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app.recipe_command.favorite.add(user_id, id).await?;

    Ok((StatusCode::CREATED, Json(load_short(&app, id).await?)))
}

pub async fn unfavorite(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app.recipe_command.favorite.remove(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app.cart_command.add(user_id, id).await?;

    Ok((StatusCode::CREATED, Json(load_short(&app, id).await?)))
}

pub async fn remove_from_cart(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app.cart_command.remove(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    State(app): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let body = app.shopping_query.download(user_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SHOPPING_LIST_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
