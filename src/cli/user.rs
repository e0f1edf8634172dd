use foodgram::config::Config;
use foodgram_shared::State;
use foodgram_user::RegisterInput;

pub(crate) async fn open_state(config: &Config) -> anyhow::Result<State> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;

    Ok(State {
        read_db: pool.clone(),
        write_db: pool,
    })
}

pub async fn create(config: Config, input: RegisterInput) -> anyhow::Result<()> {
    let state = open_state(&config).await?;
    let email = input.email.to_owned();

    let id = foodgram_user::Command::new(state.clone())
        .register(input)
        .await?;

    tracing::info!(id, "user {email} created");
    state.write_db.close().await;

    Ok(())
}

/// Prints a bearer token for an existing user.
pub async fn token(config: Config, email: String) -> anyhow::Result<()> {
    let state = open_state(&config).await?;

    let Some(user) = foodgram_user::find_by_email(&state.read_db, &email).await? else {
        tracing::error!("user {email} not found");
        return Ok(());
    };

    let token = foodgram::auth::generate_token(&config.jwt, user.id)?;
    println!("{token}");

    state.write_db.close().await;

    Ok(())
}
