//! Database layer shared by CCOS services

pub mod init;

pub use init::{init_database, init_schema};
