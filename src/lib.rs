pub mod api;
pub mod chain;
pub mod checkpoint;
pub mod decode;
pub mod directory;
pub mod error;
pub mod events;
pub mod fetch;
pub mod models;
pub mod scheduler;
pub mod schema;
pub mod sink;

#[cfg(test)]
pub mod test_utils;

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
