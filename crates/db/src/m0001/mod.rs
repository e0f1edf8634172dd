mod favorite_recipe;
mod ingredient;
mod recipe;
mod recipe_in_shopping_cart;
mod recipe_ingredient;
mod subscription;
mod tag;
mod tag_recipe;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "foodgram",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        tag::CreateTable,
        ingredient::CreateTable,
        ingredient::CreateUk1,
        ingredient::CreateIdx1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe::CreateIdx2,
        recipe_ingredient::CreateTable,
        recipe_ingredient::CreateUk1,
        tag_recipe::CreateTable,
        tag_recipe::CreateUk1,
        favorite_recipe::CreateTable,
        favorite_recipe::CreateUk1,
        recipe_in_shopping_cart::CreateTable,
        recipe_in_shopping_cart::CreateUk1,
        subscription::CreateTable,
        subscription::CreateUk1
    ]
);
