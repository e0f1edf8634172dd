use foodgram_db::table::{FavoriteRecipe, Recipe};
use foodgram_shared::{
    State,
    relation::{self, Pair, Relation, RelationKind},
};

pub struct Favorite;

impl Relation for Favorite {
    type Iden = FavoriteRecipe;
    type Target = Recipe;

    const KIND: RelationKind = RelationKind::Favorite;

    fn table() -> Self::Iden {
        FavoriteRecipe::Table
    }

    fn subject() -> Self::Iden {
        FavoriteRecipe::UserId
    }

    fn object() -> Self::Iden {
        FavoriteRecipe::RecipeId
    }

    fn target_table() -> Self::Target {
        Recipe::Table
    }

    fn target_id() -> Self::Target {
        Recipe::Id
    }
}

#[derive(Clone)]
pub struct Command(pub State);

impl Command {
    pub async fn add(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<Pair> {
        relation::add::<Favorite>(&self.0, user_id, recipe_id).await
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        relation::remove::<Favorite>(&self.0, user_id, recipe_id).await
    }

    pub async fn contains(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<bool> {
        relation::exists::<Favorite>(&self.0.read_db, user_id, recipe_id).await
    }
}
