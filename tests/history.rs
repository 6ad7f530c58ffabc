use redact_paint::{HistoryManager, ImageState, PixelBuffer};

/// A 1x1 state whose red channel identifies it
fn state(tag: u8) -> ImageState {
    ImageState::new(format!("state-{}.png", tag), PixelBuffer::filled(1, 1, [tag, 0, 0, 255]))
}

fn tag_of(state: &ImageState) -> u8 {
    state.pixels.as_ref().unwrap().pixel(0, 0).unwrap()[0]
}

#[test]
fn test_push_n_states() {
    for n in 1..=5u8 {
        let mut history = HistoryManager::new(10);
        for tag in 0..n {
            history.push(&state(tag), "push");
        }
        assert_eq!(history.can_undo(), n > 1);
        assert!(!history.can_redo());
        assert_eq!(history.len(), n as usize);
    }
}

#[test]
fn test_empty_history() {
    let mut history = HistoryManager::new(5);
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
    assert_eq!(history.current_index(), None);
    assert!(history.current_state().is_none());
}

#[test]
fn test_single_entry_cannot_undo() {
    let mut history = HistoryManager::new(5);
    history.push(&state(1), "load");
    assert_eq!(history.current_index(), Some(0));
    assert!(!history.can_undo());
    assert!(history.undo().is_none());
}

#[test]
fn test_undo_enables_redo() {
    let mut history = HistoryManager::new(5);
    history.push(&state(1), "a");
    history.push(&state(2), "b");

    let undone = history.undo().unwrap();
    assert_eq!(tag_of(&undone), 1);
    assert!(history.can_redo());
    assert!(!history.can_undo());
}

#[test]
fn test_push_after_undo_discards_redo_branch() {
    let mut history = HistoryManager::new(10);
    for tag in 1..=4 {
        history.push(&state(tag), "step");
    }
    history.undo();
    history.undo();
    history.push(&state(9), "branch");

    assert!(!history.can_redo());
    assert_eq!(history.len(), 3);
    let tags: Vec<u8> = history.entries().map(|entry| tag_of(entry.state())).collect();
    assert_eq!(tags, vec![1, 2, 9]);
}

#[test]
fn test_capacity_keeps_most_recent() {
    let max = 3;
    let mut history = HistoryManager::new(max);
    for tag in 0..(max as u8 + 4) {
        history.push(&state(tag), "step");
    }

    assert_eq!(history.len(), max);
    assert_eq!(history.current_index(), Some(max - 1));
    let tags: Vec<u8> = history.entries().map(|entry| tag_of(entry.state())).collect();
    assert_eq!(tags, vec![4, 5, 6]);
}

#[test]
fn test_zero_capacity_holds_one() {
    let mut history = HistoryManager::new(0);
    history.push(&state(1), "a");
    history.push(&state(2), "b");
    assert_eq!(history.max_size(), 1);
    assert_eq!(history.len(), 1);
    assert_eq!(tag_of(&history.current_state().unwrap()), 2);
}

#[test]
fn test_undo_redo_round_trip_is_a_distinct_copy() {
    let mut history = HistoryManager::new(5);
    history.push(&state(1), "a");
    history.push(&state(2), "b");

    let before = history.current_state().unwrap();
    history.undo();
    let mut redone = history.redo().unwrap();
    assert_eq!(redone.pixels, before.pixels);

    // Scribbling on the returned copy must not reach the stored entry
    redone
        .pixels
        .as_mut()
        .unwrap()
        .set_pixel(0, 0, [0, 0, 0, 0]);
    assert_eq!(tag_of(&history.current_state().unwrap()), 2);
}

#[test]
fn test_pushed_state_is_copied() {
    let mut history = HistoryManager::new(5);
    let mut original = state(3);
    history.push(&original, "a");

    original.pixels.as_mut().unwrap().set_pixel(0, 0, [99, 0, 0, 255]);
    assert_eq!(tag_of(&history.current_state().unwrap()), 3);
}

#[test]
fn test_clear_preserves_capacity() {
    let mut history = HistoryManager::new(7);
    history.push(&state(1), "a");
    history.clear();

    let info = history.history_info();
    assert_eq!(info.total_entries, 0);
    assert_eq!(info.current_index, None);
    assert!(!info.can_undo && !info.can_redo);
    assert_eq!(history.max_size(), 7);
}

#[test]
fn test_entries_keep_descriptions() {
    let mut history = HistoryManager::new(5);
    history.push(&state(1), "Load image");
    history.push(&state(2), "Mosaic");

    let descriptions: Vec<&str> = history.entries().map(|entry| entry.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Load image", "Mosaic"]);
}
