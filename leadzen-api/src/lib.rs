pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod sources;

pub use database::Database;
pub use sources::DbSource;
