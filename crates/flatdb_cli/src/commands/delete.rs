//! Delete command implementation.

use flatdb_core::Store;
use std::path::Path;

/// Runs the delete command. A missing `resource` deletes the whole
/// collection.
pub fn run(
    path: &Path,
    collection: &str,
    resource: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;

    match resource {
        Some(resource) => {
            store.delete(collection, resource)?;
            println!("Deleted {collection}/{resource}");
        }
        None => {
            store.delete_collection(collection)?;
            println!("Deleted collection {collection}");
        }
    }
    Ok(())
}
