//! Get command implementation.

use flatdb_core::Store;
use std::path::Path;

/// Runs the get command.
pub fn run(path: &Path, collection: &str, resource: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;
    let value: serde_json::Value = store.read(collection, resource)?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
