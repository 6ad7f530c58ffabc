//! Storage backends used by [`StatePersistence`](super::StatePersistence).
//!
//! Both traits deal in serialized JSON strings; encoding and validation
//! live one level up.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;

use super::persistence::PersistenceResult;

/// Small string settings, keyed by name
pub trait KeyValueStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>>;
    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, PersistenceResult<()>>;
    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<()>>;
}

/// Serialized image states, keyed by image id
pub trait DocumentStore: Send + Sync {
    fn put<'a>(&'a self, id: &'a str, record: String) -> BoxFuture<'a, PersistenceResult<()>>;
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>>;
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<()>>;
    fn clear(&self) -> BoxFuture<'_, PersistenceResult<()>>;
}

/// Process-local store, mostly for tests and headless use
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>> {
        async move { Ok(self.values.lock().get(key).cloned()) }.boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, PersistenceResult<()>> {
        async move {
            self.values.lock().insert(key.to_string(), value);
            Ok(())
        }
        .boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<()>> {
        async move {
            self.values.lock().remove(key);
            Ok(())
        }
        .boxed()
    }
}

impl DocumentStore for MemoryStore {
    fn put<'a>(&'a self, id: &'a str, record: String) -> BoxFuture<'a, PersistenceResult<()>> {
        async move {
            self.documents.lock().insert(id.to_string(), record);
            Ok(())
        }
        .boxed()
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>> {
        async move { Ok(self.documents.lock().get(id).cloned()) }.boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<()>> {
        async move {
            self.documents.lock().remove(id);
            Ok(())
        }
        .boxed()
    }

    fn clear(&self) -> BoxFuture<'_, PersistenceResult<()>> {
        async move {
            self.documents.lock().clear();
            Ok(())
        }
        .boxed()
    }
}

/// Directory of JSON files: settings under `settings/`, images under `images/`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

const SETTINGS_DIR: &str = "settings";
const IMAGES_DIR: &str = "images";

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, dir: &str, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(dir).join(format!("{}.json", name))
    }

    fn read(&self, dir: &str, key: &str) -> PersistenceResult<Option<String>> {
        match fs::read_to_string(self.file_path(dir, key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, dir: &str, key: &str, contents: &str) -> PersistenceResult<()> {
        fs::create_dir_all(self.root.join(dir))?;
        fs::write(self.file_path(dir, key), contents)?;
        Ok(())
    }

    fn remove_file(&self, dir: &str, key: &str) -> PersistenceResult<()> {
        match fs::remove_file(self.file_path(dir, key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>> {
        async move { self.read(SETTINGS_DIR, key) }.boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, PersistenceResult<()>> {
        async move { self.write(SETTINGS_DIR, key, &value) }.boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, PersistenceResult<()>> {
        async move { self.remove_file(SETTINGS_DIR, key) }.boxed()
    }
}

impl DocumentStore for FileStore {
    fn put<'a>(&'a self, id: &'a str, record: String) -> BoxFuture<'a, PersistenceResult<()>> {
        async move { self.write(IMAGES_DIR, id, &record) }.boxed()
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<Option<String>>> {
        async move { self.read(IMAGES_DIR, id) }.boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, PersistenceResult<()>> {
        async move { self.remove_file(IMAGES_DIR, id) }.boxed()
    }

    fn clear(&self) -> BoxFuture<'_, PersistenceResult<()>> {
        async move {
            match fs::remove_dir_all(self.root.join(IMAGES_DIR)) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
        .boxed()
    }
}
