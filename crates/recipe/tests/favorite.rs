use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_favorite_toggle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let tag = helpers::create_tag(&state, "dinner").await?;
    let id = cmd
        .create(john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await?;

    let pair = cmd.favorite.add(albert, id).await?;
    assert_eq!((pair.subject_id, pair.object_id), (albert, id));

    let err = cmd.favorite.add(albert, id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    cmd.favorite.add(john, id).await?;

    cmd.favorite.remove(albert, id).await?;
    let err = cmd.favorite.remove(albert, id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    assert!(cmd.favorite.contains(john, id).await?);
    assert!(!cmd.favorite.contains(albert, id).await?);

    Ok(())
}

#[tokio::test]
async fn test_favorite_unknown_recipe() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;

    let err = cmd.favorite.add(john, 42).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = cmd.favorite.remove(john, 42).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_view_flags() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let tag = helpers::create_tag(&state, "dinner").await?;
    let id = cmd
        .create(john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await?;

    cmd.favorite.add(albert, id).await?;
    foodgram_shopping::cart::Command(state.clone())
        .add(albert, id)
        .await?;
    foodgram_user::Command::new(state.clone())
        .subscribe(albert, john)
        .await?;

    let anonymous = foodgram_recipe::view(&state.read_db, id, None)
        .await?
        .unwrap();
    assert!(!anonymous.is_favorited);
    assert!(!anonymous.is_in_shopping_cart);
    assert!(!anonymous.author.is_subscribed);

    let viewer = foodgram_recipe::view(&state.read_db, id, Some(albert))
        .await?
        .unwrap();
    assert!(viewer.is_favorited);
    assert!(viewer.is_in_shopping_cart);
    assert!(viewer.author.is_subscribed);

    let author = foodgram_recipe::view(&state.read_db, id, Some(john))
        .await?
        .unwrap();
    assert!(!author.is_favorited);
    assert!(!author.is_in_shopping_cart);
    assert!(!author.author.is_subscribed);

    Ok(())
}
