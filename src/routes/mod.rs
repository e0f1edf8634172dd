use std::{ops::Deref, sync::Arc};

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::{get, post},
};
use foodgram_recipe::{RecipeView, ShortRecipe, image::FsImageStore};
use foodgram_shared::State;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{config::Config, error::ApiError, query::UserWithRecipes};

mod health;
mod ingredients;
mod recipes;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub state: State,
    pub user_command: foodgram_user::Command,
    pub recipe_command: foodgram_recipe::Command,
    pub cart_command: foodgram_shopping::cart::Command,
    pub shopping_query: foodgram_shopping::Query,
}

impl AppState {
    pub fn new(config: Config, state: State) -> Self {
        let images = Arc::new(FsImageStore::new(&config.media.root));

        Self {
            user_command: foodgram_user::Command::new(state.clone()),
            recipe_command: foodgram_recipe::Command::new(state.clone(), images),
            cart_command: foodgram_shopping::cart::Command(state.clone()),
            shopping_query: foodgram_shopping::Query(state.clone()),
            config,
            state,
        }
    }

    /// Public URL of a stored image reference.
    pub fn media_url(&self, reference: &str) -> String {
        format!("{}{reference}", self.config.media.url)
    }

    pub(crate) fn short_recipe(&self, mut recipe: ShortRecipe) -> ShortRecipe {
        recipe.image = self.media_url(&recipe.image);
        recipe
    }

    pub(crate) fn recipe_view(&self, mut recipe: RecipeView) -> RecipeView {
        recipe.image = self.media_url(&recipe.image);
        recipe
    }

    pub(crate) fn user_with_recipes(&self, mut user: UserWithRecipes) -> UserWithRecipes {
        user.recipes = user
            .recipes
            .into_iter()
            .map(|recipe| self.short_recipe(recipe))
            .collect();
        user
    }
}

impl Deref for AppState {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

/// `Json` with rejections rendered as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Query string with repeated keys collected into `Vec` fields.
#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

fn api() -> Router<AppState> {
    Router::new()
        .route("/tags", get(tags::list))
        .route("/tags/{id}", get(tags::detail))
        .route("/ingredients", get(ingredients::search))
        .route("/ingredients/{id}", get(ingredients::detail))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .route("/users", post(users::register))
        .route("/users/me", get(users::me))
        .route("/users/subscriptions", get(users::subscriptions))
        .route("/users/{id}", get(users::detail))
        .route(
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
}

pub fn router(app_state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api", api());

    let media_url = app_state.config.media.url.trim_end_matches('/').to_owned();
    if media_url.starts_with('/') {
        router = router.nest_service(&media_url, ServeDir::new(&app_state.config.media.root));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
