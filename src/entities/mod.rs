//! SeaORM entity definitions
//!
//! Generated-style entity modules for the clubs and stadiums tables,
//! kept in sync with the initial schema migration.

pub mod clubs;
pub mod prelude;
pub mod stadiums;
