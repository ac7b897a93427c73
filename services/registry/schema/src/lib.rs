//! sea-orm entities for the registry tables.
//!
//! References between tables are plain uuid columns without foreign keys;
//! deleting a referenced row leaves the reference dangling.

pub mod attendances;
pub mod classes;
pub mod departments;
pub mod stipends;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
