//! SeaORM migrations for multi-database support
//!
//! Database-agnostic migrations that work across SQLite, PostgreSQL, and
//! MySQL. These exist so the store can be provisioned and the repository
//! tests can run against an in-memory database.

use sea_orm_migration::prelude::*;

pub mod m20260806_100000_initial_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260806_100000_initial_schema::Migration)]
    }
}
