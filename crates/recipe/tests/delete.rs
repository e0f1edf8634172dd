use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_delete() -> anyhow::Result<()> {
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

    let err = cmd.delete(id, albert).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    cmd.delete(id, john).await?;
    assert!(cmd.load(id).await?.is_none());
    assert!(!cmd.favorite.contains(albert, id).await?);

    let err = cmd.delete(id, john).await.unwrap_err();
    assert_eq!(err.to_string(), "Recipe not found".to_owned());

    Ok(())
}

#[tokio::test]
async fn test_used_tag_and_ingredient_are_protected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let tag = helpers::create_tag(&state, "dinner").await?;

    let id = cmd
        .create(john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await?;

    let err = foodgram_recipe::tag::delete(&state, tag).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let err = foodgram_recipe::ingredient::delete(&state, salt)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    cmd.delete(id, john).await?;

    foodgram_recipe::tag::delete(&state, tag).await?;
    foodgram_recipe::ingredient::delete(&state, salt).await?;

    let err = foodgram_recipe::tag::delete(&state, tag).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}
