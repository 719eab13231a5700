//! Database access for ccos-cg
//!
//! Schema creation lives in `ccos_common::db`; this module holds the
//! service's queries.

pub mod keywords;
pub mod posts;
pub mod products;
pub mod settings;
pub mod store;

pub use store::SqliteContentStore;
