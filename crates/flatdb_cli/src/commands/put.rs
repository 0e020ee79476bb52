//! Put command implementation.

use flatdb_core::Store;
use std::path::Path;

/// Runs the put command.
pub fn run(
    path: &Path,
    collection: &str,
    resource: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed: serde_json::Value = serde_json::from_str(value)
        .map_err(|e| format!("value is not valid JSON: {e}"))?;

    let store = Store::open(path)?;
    store.write(collection, resource, &parsed)?;

    println!("Wrote {collection}/{resource}");
    Ok(())
}
