use foodgram_recipe::ShortRecipe;
use foodgram_shared::{Page, PageArgs};
use foodgram_user::UserView;
use serde::Serialize;
use sqlx::SqlitePool;

/// A user view followed by the newest recipes of that user.
#[derive(Debug, Serialize)]
pub struct UserWithRecipes {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<ShortRecipe>,
    pub recipes_count: u64,
}

async fn attach_recipes(
    pool: &SqlitePool,
    user: UserView,
    recipes_limit: Option<u64>,
) -> foodgram_shared::Result<UserWithRecipes> {
    let recipes = foodgram_recipe::short_by_author(pool, user.id, recipes_limit).await?;
    let recipes_count = foodgram_recipe::count_by_author(pool, user.id).await?;

    Ok(UserWithRecipes {
        user,
        recipes,
        recipes_count,
    })
}

pub async fn user_with_recipes(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
    recipes_limit: Option<u64>,
) -> foodgram_shared::Result<Option<UserWithRecipes>> {
    let Some(user) = foodgram_user::view(pool, id, viewer).await? else {
        return Ok(None);
    };

    Ok(Some(attach_recipes(pool, user, recipes_limit).await?))
}

/// Authors followed by `viewer` with their recipes, one page at a time.
#[tracing::instrument(skip(pool))]
pub async fn subscriptions(
    pool: &SqlitePool,
    viewer: i64,
    args: PageArgs,
    recipes_limit: Option<u64>,
) -> foodgram_shared::Result<Page<UserWithRecipes>> {
    let page = foodgram_user::subscriptions(pool, viewer, args).await?;

    let mut results = Vec::with_capacity(page.results.len());
    for user in page.results {
        results.push(attach_recipes(pool, user, recipes_limit).await?);
    }

    Ok(Page {
        count: page.count,
        next: page.next,
        previous: page.previous,
        results,
    })
}
