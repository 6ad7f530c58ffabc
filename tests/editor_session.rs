use std::sync::Arc;

use parking_lot::Mutex;
use redact_paint::event::DocumentEvent;
use redact_paint::file_handler::{decode_image, encode_png};
use redact_paint::tools::{
    ArrowSettingsPatch, BlurSettingsPatch, MosaicSettingsPatch, ResizeSettingsPatch,
};
use redact_paint::{
    AppSettings, Canvas, EditorContext, EditorError, EditorEvent, ExportFormat, ImageFile,
    LayerType, PixelBuffer, PixelSurface, Point, Region, ToolType,
};

const RED: [u8; 4] = [255, 0, 0, 255];

fn red_png(width: u32, height: u32) -> ImageFile {
    let bytes = encode_png(&PixelBuffer::filled(width, height, RED)).unwrap();
    ImageFile::new("red.png", "image/png", bytes)
}

fn loaded_editor() -> EditorContext {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut editor = EditorContext::new(AppSettings::default());
    editor.load_image(&red_png(100, 100)).unwrap();
    editor
}

fn pixels(editor: &EditorContext) -> PixelBuffer {
    editor.current_state().unwrap().pixels.clone().unwrap()
}

#[test]
fn test_load_starts_fresh_history() {
    let editor = loaded_editor();
    let state = editor.current_state().unwrap();

    assert_eq!((state.width, state.height), (100, 100));
    assert!(state.layers.is_empty());
    assert_eq!(editor.history_info().total_entries, 1);
    assert!(!editor.can_undo());
    let resize = editor.tool_state().resize_settings;
    assert_eq!((resize.width, resize.height), (100, 100));
}

#[test]
fn test_invalid_file_is_rejected() {
    let mut editor = EditorContext::default();
    let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());
    assert!(matches!(
        editor.load_image(&file),
        Err(EditorError::InvalidFile { .. })
    ));

    let corrupt = ImageFile::new("broken.png", "image/png", b"garbage".to_vec());
    assert!(matches!(
        editor.load_image(&corrupt),
        Err(EditorError::DecodeFailure(_))
    ));
    assert!(editor.current_state().is_none());
}

#[test]
fn test_effects_without_image_fail() {
    let mut editor = EditorContext::default();
    let region = Some(Region::new(0.0, 0.0, 5.0, 5.0));
    assert!(matches!(editor.apply_mosaic(region), Err(EditorError::NoPixelData)));
    assert!(matches!(editor.resize(10, 10), Err(EditorError::NoPixelData)));
    assert!(matches!(
        editor.export(ExportFormat::Png),
        Err(EditorError::NoPixelData)
    ));
}

#[test]
fn test_red_mosaic_scenario() {
    let mut editor = loaded_editor();
    editor.update_mosaic_settings(MosaicSettingsPatch { block_size: Some(10) });
    editor
        .apply_mosaic(Some(Region::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();

    let state = editor.current_state().unwrap();
    assert_eq!((state.width, state.height), (100, 100));
    assert_eq!(pixels(&editor), PixelBuffer::filled(100, 100, RED));
    assert_eq!(state.layers.len(), 1);
    assert_eq!(state.layers[0].layer_type(), LayerType::Mosaic);
    assert!(editor.can_undo());
}

#[test]
fn test_fill_selection_then_undo_redo() {
    let mut editor = loaded_editor();
    let original = pixels(&editor);

    editor.select_tool(ToolType::Select);
    editor.pointer_down(Point::new(30.0, 30.0));
    editor.pointer_move(Point::new(10.0, 10.0));
    editor.pointer_up(Point::new(10.0, 10.0)).unwrap();
    assert_eq!(editor.selection(), Some(Region::new(10.0, 10.0, 20.0, 20.0)));

    editor.apply_fill("#000000", None).unwrap();
    let filled = pixels(&editor);
    assert_eq!(filled.pixel(15, 15), Some([0, 0, 0, 255]));
    assert_eq!(filled.pixel(5, 5), Some(RED));

    assert!(editor.undo());
    assert_eq!(pixels(&editor), original);
    assert!(editor.redo());
    assert_eq!(pixels(&editor), filled);
    assert!(!editor.redo());
}

#[test]
fn test_blur_tool_drag_applies_effect() {
    let mut editor = loaded_editor();
    editor.update_blur_settings(BlurSettingsPatch { strength: Some(2.0) });
    editor.select_tool(ToolType::Blur);

    editor.pointer_down(Point::new(0.0, 0.0));
    editor.pointer_up(Point::new(50.0, 50.0)).unwrap();

    let state = editor.current_state().unwrap();
    assert_eq!(state.layers[0].layer_type(), LayerType::Blur);
    assert_eq!(state.layers[0].data.len(), 1);
    // Uniform input stays uniform
    assert_eq!(pixels(&editor), PixelBuffer::filled(100, 100, RED));
}

#[test]
fn test_pen_stroke_is_burned_in_and_recorded() {
    let mut editor = loaded_editor();
    editor.update_pen_settings(redact_paint::tools::PenSettingsPatch {
        color: Some("#0000ff".into()),
        width: Some(4.0),
    });
    editor.select_tool(ToolType::Pen);
    editor.pointer_down(Point::new(10.0, 50.0));
    editor.pointer_move(Point::new(50.0, 50.0));

    // Preview shows the stroke without committing it
    let preview = editor.preview().unwrap();
    assert_eq!(preview.pixel(30, 50), Some([0, 0, 255, 255]));
    assert_eq!(pixels(&editor).pixel(30, 50), Some(RED));

    editor.pointer_up(Point::new(90.0, 50.0)).unwrap();
    let after = pixels(&editor);
    assert_eq!(after.pixel(30, 50), Some([0, 0, 255, 255]));
    assert_eq!(after.pixel(70, 50), Some([0, 0, 255, 255]));
    assert_eq!(after.pixel(30, 10), Some(RED));

    let state = editor.current_state().unwrap();
    assert_eq!(state.layers[0].layer_type(), LayerType::Pen);
    assert_eq!(editor.history().entries().last().unwrap().description, "Pen stroke");
}

#[test]
fn test_zero_length_arrow_is_ignored() {
    let mut editor = loaded_editor();
    editor.select_tool(ToolType::Arrow);
    editor.pointer_down(Point::new(5.0, 5.0));
    editor.pointer_up(Point::new(5.0, 5.0)).unwrap();
    assert_eq!(editor.history_info().total_entries, 1);

    editor.pointer_down(Point::new(5.0, 5.0));
    editor.pointer_up(Point::new(60.0, 5.0)).unwrap();
    assert_eq!(editor.history_info().total_entries, 2);
    assert_eq!(
        editor.current_state().unwrap().layers[0].layer_type(),
        LayerType::Arrow
    );
}

#[test]
fn test_arrow_burns_shaft_and_head() {
    let mut editor = loaded_editor();
    editor.update_arrow_settings(ArrowSettingsPatch {
        color: Some("#0000ff".into()),
        width: Some(3.0),
        head_size: Some(10.0),
    });
    editor.select_tool(ToolType::Arrow);
    editor.pointer_down(Point::new(5.0, 5.0));
    editor.pointer_up(Point::new(60.0, 5.0)).unwrap();

    let after = pixels(&editor);
    // Shaft
    assert_eq!(after.pixel(30, 5), Some([0, 0, 255, 255]));
    // Head triangle spans x 51..60 and widens to y 0..10 at its base
    assert_eq!(after.pixel(56, 5), Some([0, 0, 255, 255]));
    assert_eq!(after.pixel(53, 7), Some([0, 0, 255, 255]));
    assert_eq!(after.pixel(56, 1), Some(RED));
    assert_eq!(after.pixel(30, 30), Some(RED));
}

#[test]
fn test_resize_to_target_with_aspect_lock() {
    let mut editor = EditorContext::default();
    editor.load_image(&red_png(80, 40)).unwrap();
    editor.update_resize_settings(ResizeSettingsPatch {
        width: Some(40),
        ..Default::default()
    });
    editor.resize_to_target().unwrap();

    let state = editor.current_state().unwrap();
    assert_eq!((state.width, state.height), (40, 20));
    assert!(matches!(
        editor.resize(5000, 10),
        Err(EditorError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_undo_redo_reseeds_resize_target() {
    let mut editor = EditorContext::default();
    editor.load_image(&red_png(80, 40)).unwrap();
    editor.resize(40, 20).unwrap();
    let resize = editor.tool_state().resize_settings;
    assert_eq!((resize.width, resize.height), (40, 20));

    assert!(editor.undo());
    let resize = editor.tool_state().resize_settings;
    assert_eq!((resize.width, resize.height), (80, 40));

    assert!(editor.redo());
    let resize = editor.tool_state().resize_settings;
    assert_eq!((resize.width, resize.height), (40, 20));
}

#[test]
fn test_render_and_export() {
    let editor = loaded_editor();
    let mut canvas = Canvas::new(1, 1).unwrap();
    editor.render(&mut canvas).unwrap();
    assert_eq!(canvas.size(), (100, 100));
    assert_eq!(canvas.buffer(), &pixels(&editor));

    let png = editor.export(ExportFormat::Png).unwrap();
    assert_eq!(decode_image(&png).unwrap(), pixels(&editor));
    let jpeg = editor.export(ExportFormat::Jpeg).unwrap();
    assert!(!jpeg.is_empty());
    assert_eq!(
        editor.export_file_name(ExportFormat::Jpeg).as_deref(),
        Some("red.jpg")
    );
}

#[test]
fn test_events_are_emitted() {
    let mut editor = EditorContext::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    editor.subscribe(Box::new(move |event: &EditorEvent| sink.lock().push(event.clone())));

    editor.load_image(&red_png(10, 10)).unwrap();
    editor.select_tool(ToolType::Pen);
    editor.apply_fill("red", Some(Region::new(0.0, 0.0, 2.0, 2.0))).unwrap();
    editor.undo();

    let events = seen.lock();
    assert!(matches!(
        events[0],
        EditorEvent::DocumentChanged(DocumentEvent::Loaded { width: 10, height: 10, .. })
    ));
    assert!(events.contains(&EditorEvent::ToolChanged {
        old: ToolType::Select,
        new: ToolType::Pen,
    }));
    assert!(events.iter().any(|event| matches!(
        event,
        EditorEvent::DocumentChanged(DocumentEvent::Modified { description }) if description == "Fill"
    )));
    match events.last() {
        Some(EditorEvent::HistoryChanged(info)) => {
            assert!(info.can_redo);
            assert_eq!(info.current_index, Some(0));
        }
        other => panic!("expected a history event, got {:?}", other),
    }
}

#[test]
fn test_shared_editor_serializes_access() {
    let shared = loaded_editor().into_shared();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let editor = Arc::clone(&shared);
            std::thread::spawn(move || {
                let region = Region::new(i as f32 * 10.0, 0.0, 10.0, 10.0);
                editor.lock().apply_fill("#00ff00", Some(region)).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let editor = shared.lock();
    assert_eq!(editor.history_info().total_entries, 5);
    let buffer = pixels(&editor);
    for x in [5, 15, 25, 35] {
        assert_eq!(buffer.pixel(x, 5), Some([0, 255, 0, 255]));
    }
}
