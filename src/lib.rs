pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod query;
pub mod routes;

pub use routes::AppState;
