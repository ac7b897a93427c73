//! Domain types shared across the madrasa registry.
//!
//! This crate contains only pure types and acceptance rules with no framework
//! dependencies.

pub mod attendance;
pub mod class;
pub mod date;
pub mod id;
pub mod name;
pub mod sort;
pub mod student;
pub mod validate;
