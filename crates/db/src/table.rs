use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Password,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Tag {
    Table,
    Id,
    Name,
    Color,
    Slug,
}

#[derive(Iden, Clone)]
pub enum Ingredient {
    Table,
    Id,
    Name,
    MeasurementUnit,
}

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    AuthorId,
    Name,
    Image,
    Text,
    CookingTime,
    PubDate,
}

#[derive(Iden, Clone)]
pub enum RecipeIngredient {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden, Clone)]
pub enum TagRecipe {
    Table,
    Id,
    TagId,
    RecipeId,
}

#[derive(Iden, Clone)]
pub enum FavoriteRecipe {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(Iden, Clone)]
pub enum RecipeInShoppingCart {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(Iden, Clone)]
pub enum Subscription {
    Table,
    Id,
    UserId,
    AuthorId,
}
