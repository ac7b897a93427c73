//! JSON request fixture loader.
//!
//! Loads request bodies from `fixtures/` at the workspace root.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Load a JSON fixture file relative to the workspace root.
///
/// # Example
/// ```no_run
/// use madrasa_testing::fixture::Fixture;
/// let body = Fixture::load("fixtures/stipends/merit_award.json");
/// ```
pub struct Fixture;

impl Fixture {
    /// Load and parse `workspace_root/path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = workspace_root().join(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }
}

/// First ancestor of the crate dir that holds `Cargo.lock` or the `fixtures/` tree.
fn workspace_root() -> PathBuf {
    std::env::var("CARGO_MANIFEST_DIR")
        .map(|dir| {
            let p = Path::new(&dir);
            p.ancestors()
                .find(|a| a.join("Cargo.lock").exists() || a.join("fixtures").is_dir())
                .unwrap_or(p)
                .to_path_buf()
        })
        .unwrap_or_else(|_| std::env::current_dir().unwrap())
}
