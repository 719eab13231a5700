//! # CCOS Common Library
//!
//! Shared code for the Content-Commerce OS services:
//! - Error type and result alias
//! - Bootstrap configuration (TOML) and root folder resolution
//! - Database initialization and schema
//! - Domain models (posts, products, keywords, audit findings)

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
