use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::store::{DocumentStore, KeyValueStore};
use crate::config::{AppSettings, LAST_SESSION_ID_KEY, SETTINGS_KEY};
use crate::document::ImageState;
use crate::error::{EditorError, EditorResult};
use crate::layer::Layer;
use crate::pixel_buffer::PixelBuffer;
use crate::util::time;

/// Errors that can occur inside a storage backend
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state data: {0}")]
    InvalidState(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<PersistenceError> for EditorError {
    fn from(err: PersistenceError) -> Self {
        EditorError::StorageUnavailable(err.to_string())
    }
}

/// Raw RGBA bytes as stored, a flat array of numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Serializable form of an [`ImageState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImageState {
    pub id: Uuid,
    pub original_file_name: String,
    pub width: u32,
    pub height: u32,
    pub image_data: Option<StoredPixels>,
    pub layers: Vec<Layer>,
    pub last_modified: DateTime<Utc>,
}

impl From<&ImageState> for StoredImageState {
    fn from(state: &ImageState) -> Self {
        Self {
            id: state.id,
            original_file_name: state.original_file_name.clone(),
            width: state.width,
            height: state.height,
            image_data: state.pixels.as_ref().map(|buffer| StoredPixels {
                data: buffer.as_bytes().to_vec(),
                width: buffer.width(),
                height: buffer.height(),
            }),
            layers: state.layers.clone(),
            last_modified: state.last_modified,
        }
    }
}

impl TryFrom<StoredImageState> for ImageState {
    type Error = PersistenceError;

    fn try_from(stored: StoredImageState) -> PersistenceResult<Self> {
        let pixels = match stored.image_data {
            Some(raw) => {
                if raw.width != stored.width || raw.height != stored.height {
                    return Err(PersistenceError::InvalidState(format!(
                        "pixel data is {}x{} but image is {}x{}",
                        raw.width, raw.height, stored.width, stored.height
                    )));
                }
                let buffer = PixelBuffer::from_raw(raw.width, raw.height, raw.data).ok_or_else(
                    || PersistenceError::InvalidState("pixel data length does not match dimensions".into()),
                )?;
                Some(buffer)
            }
            None => None,
        };

        Ok(ImageState {
            id: stored.id,
            original_file_name: stored.original_file_name,
            width: stored.width,
            height: stored.height,
            pixels,
            layers: stored.layers,
            last_modified: stored.last_modified,
        })
    }
}

/// Saves and restores editor sessions and user settings.
///
/// Settings live in a key-value store. Image states need a document store;
/// without one, saves fail with [`EditorError::StorageUnavailable`] and
/// loads find nothing.
pub struct StatePersistence {
    settings: Arc<dyn KeyValueStore>,
    documents: Option<Arc<dyn DocumentStore>>,
    last_save: Mutex<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for StatePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatePersistence")
            .field("has_document_store", &self.documents.is_some())
            .field("last_save", &*self.last_save.lock())
            .finish()
    }
}

impl StatePersistence {
    pub fn new(settings: Arc<dyn KeyValueStore>, documents: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            settings,
            documents,
            last_save: Mutex::new(None),
        }
    }

    /// Use one backend for both settings and documents
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: KeyValueStore + DocumentStore + 'static,
    {
        let settings: Arc<dyn KeyValueStore> = store.clone();
        let documents: Arc<dyn DocumentStore> = store;
        Self::new(settings, Some(documents))
    }

    pub fn has_document_store(&self) -> bool {
        self.documents.is_some()
    }

    /// Persist `state` and remember it as the latest session
    pub async fn save_image_state(&self, state: &ImageState) -> EditorResult<()> {
        let documents = self.documents.as_ref().ok_or_else(|| {
            EditorError::StorageUnavailable("no document store configured".into())
        })?;

        let id = state.id.to_string();
        let record = serde_json::to_string(&StoredImageState::from(state)).map_err(PersistenceError::from)?;
        if let Err(e) = documents.put(&id, record).await {
            log::error!("Failed to save image state {}: {}", id, e);
            return Err(e.into());
        }

        if let Err(e) = self.settings.set(LAST_SESSION_ID_KEY, id.clone()).await {
            log::error!("Failed to save last session id: {}", e);
        }
        *self.last_save.lock() = Some(time::now());
        log::info!("Saved image state {}", id);
        Ok(())
    }

    /// Load a saved state by id; `Ok(None)` if absent or no document store exists
    pub async fn load_image_state(&self, id: &str) -> EditorResult<Option<ImageState>> {
        let Some(documents) = self.documents.as_ref() else {
            log::warn!("No document store configured, nothing to load");
            return Ok(None);
        };
        let Some(record) = documents.get(id).await? else {
            return Ok(None);
        };
        let stored: StoredImageState = serde_json::from_str(&record).map_err(PersistenceError::from)?;
        let state = ImageState::try_from(stored)?;
        Ok(Some(state))
    }

    /// The most recently saved state. Failures are logged and read as `None`.
    pub async fn latest_session(&self) -> Option<ImageState> {
        let id = match self.settings.get(LAST_SESSION_ID_KEY).await {
            Ok(Some(id)) => id,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read last session id: {}", e);
                return None;
            }
        };
        match self.load_image_state(&id).await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to restore session {}: {}", id, e);
                None
            }
        }
    }

    pub async fn delete_image_state(&self, id: &str) -> EditorResult<()> {
        match self.documents.as_ref() {
            Some(documents) => Ok(documents.delete(id).await?),
            None => Ok(()),
        }
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> EditorResult<()> {
        let json = serde_json::to_string(settings).map_err(PersistenceError::from)?;
        if let Err(e) = self.settings.set(SETTINGS_KEY, json).await {
            log::error!("Failed to save settings: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Stored settings merged over the defaults; any failure yields the defaults
    pub async fn load_settings(&self) -> AppSettings {
        match self.settings.get(SETTINGS_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable settings: {}", e);
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(e) => {
                log::warn!("Failed to load settings: {}", e);
                AppSettings::default()
            }
        }
    }

    /// Remove every saved image and the last-session pointer. Settings are kept.
    pub async fn clear_storage(&self) -> EditorResult<()> {
        if let Some(documents) = self.documents.as_ref() {
            documents.clear().await?;
        }
        if let Err(e) = self.settings.remove(LAST_SESSION_ID_KEY).await {
            log::error!("Failed to clear last session id: {}", e);
        }
        Ok(())
    }

    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        *self.last_save.lock()
    }

    /// True when nothing was saved yet or `interval_ms` has passed since the last save
    pub fn should_autosave(&self, interval_ms: u64) -> bool {
        match self.last_save() {
            Some(last) => time::elapsed_millis(last, time::now()) >= interval_ms,
            None => true,
        }
    }
}
