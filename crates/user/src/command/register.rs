use foodgram_shared::{Constraint, violated_constraint};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::{password, repository};

static RE_USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        regex(
            path = *RE_USERNAME,
            message = "Only letters, digits and @/./+/-/_ are allowed."
        )
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        if repository::find(
            &self.state.read_db,
            repository::FindType::Email(input.email.to_owned()),
        )
        .await?
        .is_some()
        {
            foodgram_shared::conflict!("Email already exists");
        }

        let password = password::hash_password(&input.password)?;
        let created_at = foodgram_shared::now()?;

        let id = match repository::create(
            &self.state.write_db,
            repository::CreateInput {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password,
                created_at,
            },
        )
        .await
        {
            Ok(id) => id,
            Err(err) if violated_constraint(&err) == Some(Constraint::Unique) => {
                foodgram_shared::conflict!("Email or username already exists");
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = id, "user registered");

        Ok(id)
    }
}
