use std::collections::HashSet;

use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_update_with_subset() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let egg = helpers::create_ingredient(&state, "Egg", "pcs").await?;
    let milk = helpers::create_ingredient(&state, "Milk", "ml").await?;
    let breakfast = helpers::create_tag(&state, "breakfast").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;

    let id = cmd
        .create(
            john,
            helpers::recipe_input(
                "Omelette",
                &[(egg, 3), (salt, 5), (milk, 100)],
                &[breakfast, lunch],
            ),
        )
        .await?;
    let before = cmd.load(id).await?.unwrap();

    let mut input = helpers::recipe_input("Light omelette", &[(egg, 2)], &[breakfast]);
    input.image = None;
    input.cooking_time = 5;
    cmd.update(id, john, input).await?;

    let recipe = foodgram_recipe::view(&state.read_db, id, Some(john))
        .await?
        .unwrap();

    assert_eq!(recipe.name, "Light omelette");
    assert_eq!(recipe.cooking_time, 5);
    assert_eq!(recipe.image, before.image);

    let lines = recipe
        .ingredients
        .iter()
        .map(|line| (line.id, line.amount))
        .collect::<HashSet<_>>();
    assert_eq!(lines, HashSet::from([(egg, 2)]));
    assert_eq!(
        recipe.tags.iter().map(|tag| tag.id).collect::<Vec<_>>(),
        vec![breakfast]
    );

    let after = cmd.load(id).await?.unwrap();
    assert_eq!(after.pub_date, before.pub_date);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_image() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let tag = helpers::create_tag(&state, "dinner").await?;

    let id = cmd
        .create(john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await?;
    let before = cmd.load(id).await?.unwrap();

    cmd.update(id, john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await?;
    let after = cmd.load(id).await?.unwrap();

    assert_ne!(after.image, before.image);

    Ok(())
}

#[tokio::test]
async fn test_update_permissions() -> anyhow::Result<()> {
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

    let err = cmd
        .update(id, albert, helpers::recipe_input("Mine", &[(salt, 1)], &[tag]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let err = cmd
        .update(id + 100, john, helpers::recipe_input("Soup", &[(salt, 1)], &[tag]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = cmd
        .update(id, albert, helpers::recipe_input("", &[], &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    assert_eq!(cmd.load(id).await?.unwrap().name, "Soup");

    Ok(())
}

#[tokio::test]
async fn test_failed_update_keeps_previous_state() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.path()).await?;
    let cmd = helpers::command(&state, dir.path());
    let john = helpers::create_user(&state, "john").await?;
    let salt = helpers::create_ingredient(&state, "Salt", "g").await?;
    let tag = helpers::create_tag(&state, "dinner").await?;

    let id = cmd
        .create(john, helpers::recipe_input("Soup", &[(salt, 4)], &[tag]))
        .await?;

    let err = cmd
        .update(id, john, helpers::recipe_input("Broken", &[(999, 1)], &[tag]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Field { field: "ingredients", .. }));

    let recipe = foodgram_recipe::view(&state.read_db, id, None)
        .await?
        .unwrap();
    assert_eq!(recipe.name, "Soup");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].amount, 4);

    Ok(())
}
