//! Test utilities for the madrasa registry.
//!
//! Provides the fixture loader, scratch SQLite databases and scratch upload
//! directories. Import from `[dev-dependencies]` only; never in production code.

pub mod db;
pub mod fixture;
pub mod scratch;
