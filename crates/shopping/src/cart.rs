use foodgram_db::table::{Recipe, RecipeInShoppingCart};
use foodgram_shared::{
    State,
    relation::{self, Pair, Relation, RelationKind},
};

pub struct Cart;

impl Relation for Cart {
    type Iden = RecipeInShoppingCart;
    type Target = Recipe;

    const KIND: RelationKind = RelationKind::ShoppingCart;

    fn table() -> Self::Iden {
        RecipeInShoppingCart::Table
    }

    fn subject() -> Self::Iden {
        RecipeInShoppingCart::UserId
    }

    fn object() -> Self::Iden {
        RecipeInShoppingCart::RecipeId
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
        relation::add::<Cart>(&self.0, user_id, recipe_id).await
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        relation::remove::<Cart>(&self.0, user_id, recipe_id).await
    }
}
