use std::sync::Arc;

use futures::executor::block_on;
use redact_paint::config::{LAST_SESSION_ID_KEY, SETTINGS_KEY};
use redact_paint::file_handler::encode_png;
use redact_paint::state::{FileStore, KeyValueStore, MemoryStore, StoredImageState};
use redact_paint::{
    AppSettings, Command, EditorContext, EditorError, ImageFile, ImageState, PixelBuffer, Region,
    StatePersistence,
};

fn sample_state() -> ImageState {
    let state = ImageState::new("sample.png", PixelBuffer::filled(4, 3, [12, 34, 56, 255]));
    Command::ApplyMosaic {
        region: Region::new(0.0, 0.0, 2.0, 2.0),
        block_size: 4,
    }
    .execute(&state)
    .unwrap()
}

#[test]
fn test_memory_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let persistence = StatePersistence::with_store(store.clone());
    let state = sample_state();

    block_on(persistence.save_image_state(&state)).unwrap();
    let loaded = block_on(persistence.load_image_state(&state.id.to_string()))
        .unwrap()
        .unwrap();

    assert_eq!(loaded, state);
    assert_eq!(store.document_count(), 1);
    assert_eq!(
        block_on(KeyValueStore::get(store.as_ref(), LAST_SESSION_ID_KEY)).unwrap(),
        Some(state.id.to_string())
    );
}

#[test]
fn test_latest_session() {
    let persistence = StatePersistence::with_store(Arc::new(MemoryStore::new()));
    assert!(block_on(persistence.latest_session()).is_none());

    let first = sample_state();
    let second = ImageState::new("second.png", PixelBuffer::filled(2, 2, [1, 1, 1, 255]));
    block_on(persistence.save_image_state(&first)).unwrap();
    block_on(persistence.save_image_state(&second)).unwrap();

    let latest = block_on(persistence.latest_session()).unwrap();
    assert_eq!(latest.id, second.id);
}

#[test]
fn test_stored_format_uses_flat_pixels_and_iso_timestamps() {
    let state = sample_state();
    let json = serde_json::to_value(StoredImageState::from(&state)).unwrap();

    assert_eq!(json["originalFileName"], "sample.png");
    let data = json["imageData"]["data"].as_array().unwrap();
    assert_eq!(data.len(), 4 * 3 * 4);
    assert!(data.iter().all(|value| value.is_u64()));
    let timestamp = json["lastModified"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(json["layers"][0]["data"]["type"], "mosaic");
}

#[test]
fn test_corrupt_record_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let persistence = StatePersistence::with_store(store.clone());
    let state = sample_state();

    let mut stored = StoredImageState::from(&state);
    if let Some(pixels) = stored.image_data.as_mut() {
        pixels.data.truncate(7);
    }
    let record = serde_json::to_string(&stored).unwrap();
    block_on(redact_paint::state::DocumentStore::put(
        store.as_ref(),
        &state.id.to_string(),
        record,
    ))
    .unwrap();
    block_on(KeyValueStore::set(
        store.as_ref(),
        LAST_SESSION_ID_KEY,
        state.id.to_string(),
    ))
    .unwrap();

    assert!(matches!(
        block_on(persistence.load_image_state(&state.id.to_string())),
        Err(EditorError::StorageUnavailable(_))
    ));
    // Session restore swallows the failure
    assert!(block_on(persistence.latest_session()).is_none());
}

#[test]
fn test_missing_document_store() {
    let persistence = StatePersistence::new(Arc::new(MemoryStore::new()), None);
    let state = sample_state();

    assert!(matches!(
        block_on(persistence.save_image_state(&state)),
        Err(EditorError::StorageUnavailable(_))
    ));
    assert!(block_on(persistence.load_image_state("anything")).unwrap().is_none());
}

#[test]
fn test_settings_merge_over_defaults() {
    let store = Arc::new(MemoryStore::new());
    let persistence = StatePersistence::with_store(store.clone());
    assert_eq!(block_on(persistence.load_settings()), AppSettings::default());

    block_on(KeyValueStore::set(
        store.as_ref(),
        SETTINGS_KEY,
        r##"{"defaultPenColor":"#123456","maxHistorySize":5}"##.to_string(),
    ))
    .unwrap();
    let settings = block_on(persistence.load_settings());
    assert_eq!(settings.default_pen_color, "#123456");
    assert_eq!(settings.max_history_size, 5);
    assert_eq!(settings.auto_save_interval, 30_000);

    block_on(KeyValueStore::set(store.as_ref(), SETTINGS_KEY, "{broken".to_string())).unwrap();
    assert_eq!(block_on(persistence.load_settings()), AppSettings::default());
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = StatePersistence::with_store(Arc::new(FileStore::new(dir.path())));
    let state = sample_state();

    let settings = AppSettings {
        default_blur_strength: 4.0,
        ..AppSettings::default()
    };
    block_on(persistence.save_settings(&settings)).unwrap();
    block_on(persistence.save_image_state(&state)).unwrap();

    let restored = block_on(persistence.latest_session()).unwrap();
    assert_eq!(restored, state);
    assert_eq!(block_on(persistence.load_settings()), settings);

    block_on(persistence.delete_image_state(&state.id.to_string())).unwrap();
    assert!(block_on(persistence.load_image_state(&state.id.to_string()))
        .unwrap()
        .is_none());
}

#[test]
fn test_clear_storage_keeps_settings() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = StatePersistence::with_store(Arc::new(FileStore::new(dir.path())));
    let settings = AppSettings {
        max_history_size: 12,
        ..AppSettings::default()
    };
    block_on(persistence.save_settings(&settings)).unwrap();
    block_on(persistence.save_image_state(&sample_state())).unwrap();

    block_on(persistence.clear_storage()).unwrap();
    assert!(block_on(persistence.latest_session()).is_none());
    assert_eq!(block_on(persistence.load_settings()), settings);
}

#[test]
fn test_editor_session_save_and_restore() {
    let store = Arc::new(MemoryStore::new());
    let bytes = encode_png(&PixelBuffer::filled(6, 6, [0, 128, 0, 255])).unwrap();

    let mut editor = EditorContext::new(AppSettings::default())
        .with_persistence(StatePersistence::with_store(store.clone()));
    assert!(!editor.autosave_due());
    editor.load_image(&ImageFile::new("green.png", "", bytes)).unwrap();
    assert!(editor.autosave_due());
    editor
        .apply_fill("white", Some(Region::new(0.0, 0.0, 3.0, 3.0)))
        .unwrap();
    block_on(editor.save_session()).unwrap();
    assert!(!editor.autosave_due());
    let saved = editor.current_state().unwrap().clone();

    let mut restored = block_on(EditorContext::from_persistence(
        StatePersistence::with_store(store),
    ));
    assert!(block_on(restored.restore_latest_session()));
    assert_eq!(restored.current_state(), Some(&saved));
    // A restored session starts its own history
    assert_eq!(restored.history_info().total_entries, 1);
}

#[test]
fn test_save_session_without_persistence() {
    let editor = EditorContext::default();
    assert!(matches!(
        block_on(editor.save_session()),
        Err(EditorError::StorageUnavailable(_))
    ));
}
