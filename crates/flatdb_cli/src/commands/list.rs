//! List command implementation.

use flatdb_core::Store;
use std::path::Path;

/// Runs the list command.
pub fn run(path: &Path, collection: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;
    let records = store.read_all(collection)?;

    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    println!("{} record(s) in {collection}", records.len());
    Ok(())
}
