pub mod cart;
mod list;

use std::ops::Deref;

use foodgram_shared::State;

pub use list::*;

pub const SHOPPING_LIST_FILE_NAME: &str = "foodgram_shopping_cart.txt";

#[derive(Clone)]
pub struct Query(pub State);

impl Deref for Query {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
