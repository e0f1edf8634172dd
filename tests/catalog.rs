use axum::http::{Method, StatusCode};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_tags_are_listed_by_name() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(dir.path()).await?;
    let lunch = app.create_tag("lunch", "#E26C2D").await?;
    app.create_tag("breakfast", "#49B64E").await?;

    let (status, body) = app.json(Method::GET, "/api/tags", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let slugs = body
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["slug"].as_str().unwrap().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(slugs, vec!["breakfast", "lunch"]);

    let (status, body) = app
        .json(Method::GET, &format!("/api/tags/{lunch}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "#E26C2D");

    let (status, body) = app.json(Method::GET, "/api/tags/999", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_ingredient_prefix_search() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(dir.path()).await?;
    app.create_ingredient("Sugar", "g").await?;
    app.create_ingredient("Salt", "pinch").await?;
    app.create_ingredient("Salt", "g").await?;
    let rice = app.create_ingredient("Rice", "g").await?;

    let (status, body) = app
        .json(Method::GET, "/api/ingredients?name=sa", None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let found = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| {
            format!(
                "{} {}",
                i["name"].as_str().unwrap(),
                i["measurement_unit"].as_str().unwrap()
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["Salt g", "Salt pinch"]);

    let (_, body) = app
        .json(Method::GET, "/api/ingredients?search=SU", None, None)
        .await?;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app.json(Method::GET, "/api/ingredients", None, None).await?;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = app
        .json(Method::GET, &format!("/api/ingredients/{rice}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rice");

    let (status, _) = app
        .json(Method::GET, "/api/ingredients/not-a-number", None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_health_and_ready() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(dir.path()).await?;

    let (status, body) = app.json(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.json(Method::GET, "/ready", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    Ok(())
}
