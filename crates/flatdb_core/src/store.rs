//! Storage driver: atomic, collection-scoped record persistence.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::locks::LockRegistry;
use crate::paths::{self, RECORD_EXT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An embedded document store that persists records as JSON files.
///
/// Records are grouped into named collections, each a subdirectory of the
/// store root; one record is one `<resource>.json` file. There is no server
/// process and no query layer: the store maps keys to files, serializes
/// access per collection, and commits every write atomically.
///
/// # Consistency
///
/// Writes go to a `.tmp` sibling first and are swapped into place with an
/// atomic rename, so a reader never observes a half-written record and a
/// crash mid-write leaves the previously committed value intact. An
/// orphaned `.tmp` file left by a crash is ignored by readers.
///
/// # Thread Safety
///
/// `Store` is `Send + Sync`. Operations on the same collection are strictly
/// serialized by a per-collection lock; operations on different collections
/// proceed in parallel.
///
/// # Example
///
/// ```no_run
/// use flatdb_core::Store;
/// use serde_json::json;
///
/// # fn main() -> flatdb_core::StoreResult<()> {
/// let store = Store::open("my_data")?;
///
/// store.write("users", "john", &json!({ "name": "John", "age": 30 }))?;
/// let john: serde_json::Value = store.read("users", "john")?;
/// store.delete("users", "john")?;
/// # Ok(())
/// # }
/// ```
pub struct Store {
    /// Root directory owning all collections.
    root: PathBuf,
    /// Per-collection locks, created lazily, reused for the store's lifetime.
    locks: LockRegistry,
    /// Open-time configuration.
    config: Config,
}

impl Store {
    /// Opens a store rooted at `path` with default configuration.
    ///
    /// The root directory (and its parents) are created if absent; an
    /// existing root is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or is not a directory.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a store rooted at `path` with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the root is absent and
    /// `create_if_missing` is false, and a storage fault if the path exists
    /// but is not a directory.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> StoreResult<Self> {
        let root = path.as_ref().to_path_buf();

        if !root.exists() {
            if !config.create_if_missing {
                return Err(StoreError::not_found(root.display().to_string()));
            }
            debug!(root = %root.display(), "creating store root");
            fs::create_dir_all(&root)?;
        } else if !root.is_dir() {
            return Err(StoreError::Storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("store root is not a directory: {}", root.display()),
            )));
        } else {
            debug!(root = %root.display(), "opening existing store root");
        }

        Ok(Self {
            root,
            locks: LockRegistry::new(),
            config,
        })
    }

    /// Returns the root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `value` as the record `collection/resource`, creating the
    /// collection on first use and replacing any existing record.
    ///
    /// The encoded bytes are written to a temporary sibling and swapped in
    /// with an atomic rename, so no partial record is ever visible at the
    /// final path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] for an unusable name, a codec
    /// error if the value cannot be serialized, and a storage fault for any
    /// filesystem failure.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        value: &T,
    ) -> StoreResult<()> {
        let paths = paths::record_paths(&self.root, collection, resource)?;

        let lock = self.locks.collection_lock(collection);
        let _guard = lock.lock();

        let collection_dir = self.root.join(collection);
        fs::create_dir_all(&collection_dir)?;

        let bytes = flatdb_codec::to_pretty_json(value)?;

        let mut file = File::create(&paths.temp_path)?;
        file.write_all(&bytes)?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        drop(file);

        // The rename is the commit point.
        fs::rename(&paths.temp_path, &paths.final_path)?;
        self.sync_directory(&collection_dir)?;

        trace!(collection, resource, bytes = bytes.len(), "wrote record");
        Ok(())
    }

    /// Reads the record `collection/resource`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the record does not exist and a
    /// codec error if its content does not decode into `T`.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> StoreResult<T> {
        let paths = paths::record_paths(&self.root, collection, resource)?;

        let lock = self.locks.collection_lock(collection);
        let _guard = lock.lock();

        let bytes = match fs::read(&paths.final_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(format!("{collection}/{resource}")));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(flatdb_codec::from_json(&bytes)?)
    }

    /// Reads every record in `collection`.
    ///
    /// Records come back in directory-listing order, which carries no
    /// meaning. The call is all-or-nothing: one malformed record fails the
    /// whole listing with a codec error naming the offending file, so a
    /// caller never silently loses records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the collection directory does
    /// not exist.
    pub fn read_all(&self, collection: &str) -> StoreResult<Vec<serde_json::Value>> {
        paths::validate_name("collection", collection)?;

        let lock = self.locks.collection_lock(collection);
        let _guard = lock.lock();

        let entries = match fs::read_dir(self.root.join(collection)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(collection.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            // Only committed records carry the `json` extension; an orphaned
            // `<resource>.json.tmp` from an interrupted write is skipped.
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }

            let bytes = fs::read(&path)?;
            let value = flatdb_codec::from_json(&bytes).map_err(|e| {
                flatdb_codec::CodecError::decoding_failed(format!("{}: {e}", path.display()))
            })?;
            records.push(value);
        }

        Ok(records)
    }

    /// Deletes the record `collection/resource`, or the entire collection
    /// when `resource` is empty.
    ///
    /// Deletion is idempotent: an absent record or collection is success,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage fault for any filesystem error other than
    /// not-found.
    pub fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        if resource.is_empty() {
            return self.delete_collection(collection);
        }

        let paths = paths::record_paths(&self.root, collection, resource)?;

        let lock = self.locks.collection_lock(collection);
        let _guard = lock.lock();

        match fs::remove_file(&paths.final_path) {
            Ok(()) => {
                self.sync_directory(&self.root.join(collection))?;
                debug!(collection, resource, "deleted record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes `collection` and every record in it.
    ///
    /// Idempotent like [`Store::delete`]; an absent collection is success.
    pub fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        paths::validate_name("collection", collection)?;

        let lock = self.locks.collection_lock(collection);
        let _guard = lock.lock();

        match fs::remove_dir_all(self.root.join(collection)) {
            Ok(()) => {
                self.sync_directory(&self.root)?;
                debug!(collection, "deleted collection");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fsyncs a directory so renames and removals within it are durable.
    ///
    /// On Windows, directory handles cannot be fsynced; NTFS journaling
    /// covers metadata durability there.
    #[cfg(unix)]
    fn sync_directory(&self, dir: &Path) -> StoreResult<()> {
        if !self.config.sync_writes {
            return Ok(());
        }
        let dir = File::open(dir)?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self, _dir: &Path) -> StoreResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn create_store() -> (tempfile::TempDir, Store) {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path().join("db")).unwrap();
        (temp, store)
    }

    #[test]
    fn open_creates_root() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("nested").join("db");

        assert!(!root.exists());
        let store = Store::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root);
    }

    #[test]
    fn open_existing_root_is_not_an_error() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("db");

        Store::open(&root).unwrap();
        Store::open(&root).unwrap();
    }

    #[test]
    fn open_fails_if_missing_and_no_create() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("absent");

        let config = Config::new().create_if_missing(false);
        let result = Store::open_with_config(&root, config);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn open_fails_on_non_directory_root() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("not_a_dir");
        fs::write(&file_path, b"x").unwrap();

        let result = Store::open(&file_path);
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (_temp, store) = create_store();

        let user = User {
            name: "John".to_string(),
            age: 30,
        };
        store.write("users", "john", &user).unwrap();

        let found: User = store.read("users", "john").unwrap();
        assert_eq!(found, user);
    }

    #[test]
    fn write_produces_documented_layout() {
        let (_temp, store) = create_store();

        store
            .write("users", "john", &json!({ "age": 30, "name": "John" }))
            .unwrap();

        let record_path = store.root().join("users").join("john.json");
        assert!(record_path.is_file());

        let content = fs::read_to_string(&record_path).unwrap();
        assert_eq!(content, "{\n  \"age\": 30,\n  \"name\": \"John\"\n}\n");

        // No temp sibling survives a successful write.
        assert!(!store.root().join("users").join("john.json.tmp").exists());
    }

    #[test]
    fn write_overwrites_existing_record() {
        let (_temp, store) = create_store();

        store.write("users", "john", &json!({ "age": 30 })).unwrap();
        store.write("users", "john", &json!({ "age": 31 })).unwrap();

        let found: serde_json::Value = store.read("users", "john").unwrap();
        assert_eq!(found, json!({ "age": 31 }));
    }

    #[test]
    fn read_missing_record_is_not_found() {
        let (_temp, store) = create_store();

        let result: StoreResult<serde_json::Value> = store.read("users", "ghost");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn read_malformed_record_is_codec_error() {
        let (_temp, store) = create_store();

        store.write("users", "john", &json!({ "age": 30 })).unwrap();
        fs::write(store.root().join("users").join("john.json"), b"{ broken").unwrap();

        let result: StoreResult<serde_json::Value> = store.read("users", "john");
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn invalid_keys_are_rejected_on_every_operation() {
        let (_temp, store) = create_store();

        for (collection, resource) in [
            ("", "john"),
            ("users", ""),
            ("..", "john"),
            ("users", ".."),
            ("a/b", "john"),
            ("users", "a/b"),
        ] {
            let write = store.write(collection, resource, &json!({}));
            assert!(
                matches!(write, Err(StoreError::InvalidKey { .. })),
                "write accepted {collection:?}/{resource:?}"
            );

            let read: StoreResult<serde_json::Value> = store.read(collection, resource);
            assert!(
                matches!(read, Err(StoreError::InvalidKey { .. })),
                "read accepted {collection:?}/{resource:?}"
            );
        }

        // An empty resource is only meaningful for delete; the collection
        // name is still validated there.
        assert!(matches!(
            store.delete("", "john"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.delete("..", ""),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.read_all(".."),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let (_temp, store) = create_store();

        store.write("users", "john", &json!({ "age": 30 })).unwrap();

        store.delete("users", "john").unwrap();
        store.delete("users", "john").unwrap();

        let result: StoreResult<serde_json::Value> = store.read("users", "john");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn empty_resource_deletes_whole_collection() {
        let (_temp, store) = create_store();

        store.write("users", "a", &json!({ "x": 1 })).unwrap();
        store.write("users", "b", &json!({ "x": 2 })).unwrap();

        store.delete("users", "").unwrap();

        let a: StoreResult<serde_json::Value> = store.read("users", "a");
        let b: StoreResult<serde_json::Value> = store.read("users", "b");
        assert!(matches!(a, Err(StoreError::NotFound { .. })));
        assert!(matches!(b, Err(StoreError::NotFound { .. })));
        assert!(!store.root().join("users").exists());

        // Second collection delete is also a no-op.
        store.delete("users", "").unwrap();
        store.delete_collection("users").unwrap();
    }

    #[test]
    fn read_all_returns_every_record() {
        let (_temp, store) = create_store();

        store.write("users", "a", &json!({ "x": 1 })).unwrap();
        store.write("users", "b", &json!({ "x": 2 })).unwrap();

        let mut records = store.read_all("users").unwrap();
        assert_eq!(records.len(), 2);

        records.sort_by_key(|v| v["x"].as_i64());
        assert_eq!(records[0], json!({ "x": 1 }));
        assert_eq!(records[1], json!({ "x": 2 }));
    }

    #[test]
    fn read_all_missing_collection_is_not_found() {
        let (_temp, store) = create_store();

        let result = store.read_all("ghosts");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn read_all_skips_non_record_entries() {
        let (_temp, store) = create_store();

        store.write("users", "a", &json!({ "x": 1 })).unwrap();

        let dir = store.root().join("users");
        fs::write(dir.join("notes.txt"), b"not a record").unwrap();
        fs::write(dir.join("b.json.tmp"), b"{ half-writ").unwrap();
        fs::create_dir(dir.join("sub.json")).unwrap();

        let records = store.read_all("users").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], json!({ "x": 1 }));
    }

    #[test]
    fn read_all_fails_whole_listing_on_malformed_record() {
        let (_temp, store) = create_store();

        store.write("users", "a", &json!({ "x": 1 })).unwrap();
        fs::write(store.root().join("users").join("bad.json"), b"{ broken").unwrap();

        let result = store.read_all("users");
        match result {
            Err(StoreError::Codec(e)) => {
                assert!(e.to_string().contains("bad.json"), "error was: {e}");
            }
            other => panic!("expected codec error, got {other:?}"),
        }
    }

    #[test]
    fn records_persist_across_store_instances() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("db");

        {
            let store = Store::open(&root).unwrap();
            store
                .write(
                    "users",
                    "john",
                    &User {
                        name: "John".to_string(),
                        age: 30,
                    },
                )
                .unwrap();
        }

        let store = Store::open(&root).unwrap();
        let found: User = store.read("users", "john").unwrap();
        assert_eq!(found.name, "John");
        assert_eq!(found.age, 30);
    }

    #[test]
    fn collections_are_isolated() {
        let (_temp, store) = create_store();

        store.write("users", "a", &json!({ "kind": "user" })).unwrap();
        store.write("posts", "a", &json!({ "kind": "post" })).unwrap();

        let user: serde_json::Value = store.read("users", "a").unwrap();
        let post: serde_json::Value = store.read("posts", "a").unwrap();
        assert_eq!(user["kind"], "user");
        assert_eq!(post["kind"], "post");

        store.delete_collection("users").unwrap();
        let post_again: StoreResult<serde_json::Value> = store.read("posts", "a");
        assert!(post_again.is_ok());
    }
}
