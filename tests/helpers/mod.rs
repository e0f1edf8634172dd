use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use foodgram::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, ServerConfig},
};
use foodgram_shared::State;
use foodgram_user::RegisterInput;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::{io::Cursor, path::Path, str::FromStr};
use tower::ServiceExt;

pub struct TestApp {
    pub app: AppState,
    pub router: Router,
}

fn test_config(dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.join("db.sqlite3").to_str().unwrap()),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 7,
            issuer: "foodgram".to_owned(),
            audience: "foodgram-api".to_owned(),
        },
        media: MediaConfig {
            root: dir.join("media").to_str().unwrap().to_owned(),
            url: "/media/".to_owned(),
        },
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_app(dir: &Path) -> anyhow::Result<TestApp> {
    let config = test_config(dir);
    let opts = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let state = State {
        read_db: pool.clone(),
        write_db: pool,
    };
    let app = AppState::new(config, state);

    Ok(TestApp {
        router: foodgram::routes::router(app.clone()),
        app,
    })
}

impl TestApp {
    /// Registers `name` and returns its id with a bearer token.
    #[allow(dead_code)]
    pub async fn create_user(&self, name: &str) -> anyhow::Result<(i64, String)> {
        let id = self
            .app
            .user_command
            .register(RegisterInput {
                email: format!("{name}@foodgram.localhost"),
                username: name.to_owned(),
                first_name: "John".to_owned(),
                last_name: "Doe".to_owned(),
                password: "my_password".to_owned(),
            })
            .await?;
        let token = foodgram::auth::generate_token(&self.app.config.jwt, id)?;

        Ok((id, token))
    }

    #[allow(dead_code)]
    pub async fn create_tag(&self, slug: &str, color: &str) -> anyhow::Result<i64> {
        let tag = foodgram_recipe::tag::create(
            &self.app.state,
            foodgram_recipe::tag::CreateInput {
                name: slug.to_uppercase(),
                color: color.to_owned(),
                slug: slug.to_owned(),
            },
        )
        .await?;

        Ok(tag.id)
    }

    #[allow(dead_code)]
    pub async fn create_ingredient(&self, name: &str, unit: &str) -> anyhow::Result<i64> {
        let ingredient = foodgram_recipe::ingredient::create(
            &self.app.state,
            foodgram_recipe::ingredient::CreateInput {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
            },
        )
        .await?;

        Ok(ingredient.id)
    }

    /// Sends a request and returns the status with the raw body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Vec<u8>)> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok((status, headers, bytes.to_vec()))
    }

    /// Like [`TestApp::send`] but decodes the body as JSON, `Null` when empty.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _, bytes) = self.send(method, uri, token, body).await?;
        if bytes.is_empty() {
            return Ok((status, Value::Null));
        }

        Ok((status, serde_json::from_slice(&bytes)?))
    }

    /// Creates a recipe through the API and returns its id.
    #[allow(dead_code)]
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        ingredients: &[(i64, i64)],
        tags: &[i64],
    ) -> anyhow::Result<i64> {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/recipes",
                Some(token),
                Some(recipe_body(name, ingredients, tags)),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        Ok(body["id"].as_i64().unwrap())
    }
}

pub fn image_data_uri() -> String {
    let mut bytes = Cursor::new(vec![]);
    image::RgbImage::new(1, 1)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();

    format!("data:image/png;base64,{}", STANDARD.encode(bytes.into_inner()))
}

pub fn recipe_body(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> Value {
    json!({
        "name": name,
        "image": image_data_uri(),
        "text": "Mix everything.",
        "cooking_time": 10,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
        "tags": tags,
    })
}
