use foodgram_user::RegisterInput;
use temp_dir::TempDir;

mod helpers;

fn input(email: &str, username: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "John".to_owned(),
        last_name: "Doe".to_owned(),
        password: "my_password".to_owned(),
    }
}

#[tokio::test]
async fn validate_unique_emails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);

    cmd.register(input("john.doe@foodgram.localhost", "john"))
        .await?;

    let err = cmd
        .register(input("John.Doe@foodgram.localhost", "john2"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Email already exists".to_owned());

    Ok(())
}

#[tokio::test]
async fn validate_unique_usernames() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);

    cmd.register(input("john@foodgram.localhost", "john")).await?;

    let err = cmd
        .register(input("other@foodgram.localhost", "john"))
        .await
        .unwrap_err();

    assert!(matches!(err, foodgram_shared::Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn validate_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = foodgram_user::Command::new(state);

    let err = cmd
        .register(input("not-an-email", "john"))
        .await
        .unwrap_err();
    assert!(matches!(err, foodgram_shared::Error::Validate(_)));

    let err = cmd
        .register(input("john@foodgram.localhost", "john doe"))
        .await
        .unwrap_err();
    assert!(matches!(err, foodgram_shared::Error::Validate(_)));

    let mut short = input("john@foodgram.localhost", "john");
    short.password = "short".to_owned();
    let err = cmd.register(short).await.unwrap_err();
    assert!(matches!(err, foodgram_shared::Error::Validate(_)));

    Ok(())
}

#[tokio::test]
async fn test_verify_credentials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let id = helpers::create_user(&state, "john").await?;

    let user =
        foodgram_user::verify_credentials(&state.read_db, "john@foodgram.localhost", "my_password")
            .await?;
    assert_eq!(user.map(|u| u.id), Some(id));

    let user =
        foodgram_user::verify_credentials(&state.read_db, "john@foodgram.localhost", "wrong_pass")
            .await?;
    assert!(user.is_none());

    let user =
        foodgram_user::verify_credentials(&state.read_db, "nobody@foodgram.localhost", "my_password")
            .await?;
    assert!(user.is_none());

    Ok(())
}
