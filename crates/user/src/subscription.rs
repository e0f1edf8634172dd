use foodgram_db::table::{Subscription, User};
use foodgram_shared::{
    State,
    relation::{self, Pair, Relation, RelationKind},
};

/// `subscription(user_id -> author_id)`, a user cannot follow themselves.
pub struct Follow;

impl Relation for Follow {
    type Iden = Subscription;
    type Target = User;

    const KIND: RelationKind = RelationKind::Subscription;
    const REFLEXIVE: bool = false;

    fn table() -> Self::Iden {
        Subscription::Table
    }

    fn subject() -> Self::Iden {
        Subscription::UserId
    }

    fn object() -> Self::Iden {
        Subscription::AuthorId
    }

    fn target_table() -> Self::Target {
        User::Table
    }

    fn target_id() -> Self::Target {
        User::Id
    }
}

impl crate::Command {
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<Pair> {
        relation::add::<Follow>(&self.state, user_id, author_id).await
    }

    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        relation::remove::<Follow>(&self.state, user_id, author_id).await
    }
}

pub async fn is_subscribed(
    state: &State,
    user_id: i64,
    author_id: i64,
) -> foodgram_shared::Result<bool> {
    relation::exists::<Follow>(&state.read_db, user_id, author_id).await
}
