//! HTTP API handlers for ccos-cg
//!
//! JSON in and out, camelCase keys. Errors use the [`crate::ApiError`]
//! payload `{"error": {"code", "message"}}`.

pub mod generate;
pub mod health;
pub mod keywords;
pub mod posts;
pub mod products;
pub mod settings;

pub use generate::generate_routes;
pub use health::health_routes;
pub use keywords::keyword_routes;
pub use posts::post_routes;
pub use products::product_routes;
pub use settings::settings_routes;
