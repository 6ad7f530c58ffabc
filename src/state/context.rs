//! The editing session: one current image, its history, the tools and the
//! notifications that tie them to a front end.
//!
//! All mutation goes through `&mut EditorContext`. Hosts that touch the
//! editor from more than one thread share it as a [`SharedEditor`], which
//! serializes every call behind a single lock.

use std::sync::Arc;

use parking_lot::Mutex;

use super::persistence::StatePersistence;
use crate::command::{Command, HistoryInfo, HistoryManager};
use crate::config::{AppSettings, canvas, file};
use crate::document::ImageState;
use crate::effects;
use crate::error::{EditorError, EditorResult};
use crate::event::{DocumentEvent, EditorEvent, EventBus, EventHandler};
use crate::file_handler::{self, ExportFormat, ImageFile};
use crate::geometry::{self, Point, Region};
use crate::pixel_buffer::PixelBuffer;
use crate::renderer::PixelSurface;
use crate::tools::{
    ArrowSettingsPatch, BlurSettingsPatch, MosaicSettingsPatch, PenSettingsPatch,
    ResizeSettingsPatch, ToolManager, ToolOutput, ToolState, ToolType,
};

/// Editor handle shared between threads; the lock is the single writer
pub type SharedEditor = Arc<Mutex<EditorContext>>;

#[derive(Debug)]
pub struct EditorContext {
    settings: AppSettings,
    current: Option<ImageState>,
    history: HistoryManager,
    tools: ToolManager,
    selection: Option<Region>,
    event_bus: EventBus,
    persistence: Option<StatePersistence>,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

impl EditorContext {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            history: HistoryManager::new(settings.max_history_size),
            tools: ToolManager::new(&settings),
            settings,
            current: None,
            selection: None,
            event_bus: EventBus::new(),
            persistence: None,
        }
    }

    /// Attach a persistence backend for session save and restore
    pub fn with_persistence(mut self, persistence: StatePersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Build an editor from the settings stored in `persistence`
    pub async fn from_persistence(persistence: StatePersistence) -> Self {
        let settings = persistence.load_settings().await;
        Self::new(settings).with_persistence(persistence)
    }

    pub fn into_shared(self) -> SharedEditor {
        Arc::new(Mutex::new(self))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn persistence(&self) -> Option<&StatePersistence> {
        self.persistence.as_ref()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn current_state(&self) -> Option<&ImageState> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    // --- Loading ---

    /// Validate, decode and open `image_file` as a new session
    pub fn load_image(&mut self, image_file: &ImageFile) -> EditorResult<&ImageState> {
        let state = file_handler::load_image(image_file)?;
        log::info!(
            "Loaded {} ({}x{})",
            state.original_file_name,
            state.width,
            state.height
        );
        self.open(state, "Load image");
        self.current_state().ok_or(EditorError::NoPixelData)
    }

    /// Open a previously saved state as a new session
    pub fn restore_state(&mut self, state: ImageState) -> EditorResult<()> {
        if !state.is_consistent() {
            return Err(EditorError::InvalidDimensions {
                width: state.width,
                height: state.height,
            });
        }
        self.open(state, "Restore session");
        Ok(())
    }

    fn open(&mut self, state: ImageState, description: &str) {
        self.tools.cancel_all();
        self.selection = None;
        self.history.clear();
        self.history.push(&state, description);
        self.seed_resize_settings(state.width, state.height);

        let event = DocumentEvent::Loaded {
            id: state.id,
            width: state.width,
            height: state.height,
        };
        self.current = Some(state);
        self.event_bus.emit(EditorEvent::DocumentChanged(event));
        self.emit_history();
    }

    // --- Tools ---

    pub fn active_tool(&self) -> ToolType {
        self.tools.active_tool()
    }

    pub fn tool_state(&self) -> &ToolState {
        self.tools.tool_state()
    }

    pub fn tool_manager(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tool_manager_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    /// Switch tools; any gesture in progress is dropped
    pub fn select_tool(&mut self, tool: ToolType) {
        let old = self.tools.select_tool(tool);
        if old != tool {
            self.event_bus
                .emit(EditorEvent::ToolChanged { old, new: tool });
        }
    }

    pub fn update_pen_settings(&mut self, patch: PenSettingsPatch) {
        self.tools.update_pen_settings(patch);
    }

    pub fn update_arrow_settings(&mut self, patch: ArrowSettingsPatch) {
        self.tools.update_arrow_settings(patch);
    }

    pub fn update_blur_settings(&mut self, patch: BlurSettingsPatch) {
        self.tools.update_blur_settings(patch);
    }

    pub fn update_mosaic_settings(&mut self, patch: MosaicSettingsPatch) {
        self.tools.update_mosaic_settings(patch);
    }

    /// Merge resize settings, keeping the current image's aspect ratio when locked
    pub fn update_resize_settings(&mut self, patch: ResizeSettingsPatch) {
        let source = self.current.as_ref().map(|state| (state.width, state.height));
        self.tools.update_resize_settings(patch, source);
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, pos: Point) {
        self.tools.pointer_down(pos);
    }

    pub fn pointer_move(&mut self, pos: Point) {
        self.tools.pointer_move(pos);
    }

    /// Finish the active gesture and commit whatever it produced.
    ///
    /// Blur and mosaic apply to the dragged region straight away; the select
    /// tool only records it as the current selection.
    pub fn pointer_up(&mut self, pos: Point) -> EditorResult<()> {
        let Some(output) = self.tools.pointer_up(pos) else {
            return Ok(());
        };

        match output {
            ToolOutput::Path(path) => self.execute(Command::AddPath(path)),
            ToolOutput::Arrow(arrow) => {
                if arrow.start == arrow.end {
                    log::debug!("Ignoring zero-length arrow");
                    return Ok(());
                }
                self.execute(Command::AddArrow(arrow))
            }
            ToolOutput::Region(region) => {
                if !geometry::is_valid_region(&region) {
                    self.set_selection(None);
                    return Ok(());
                }
                match self.tools.active_tool() {
                    ToolType::Blur => self.apply_blur(Some(region)),
                    ToolType::Mosaic => self.apply_mosaic(Some(region)),
                    _ => {
                        self.set_selection(Some(region));
                        Ok(())
                    }
                }
            }
        }
    }

    /// Drop any gesture in progress without committing it
    pub fn cancel_interaction(&mut self) {
        self.tools.cancel_all();
    }

    pub fn selection(&self) -> Option<Region> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Region>) {
        if self.selection != selection {
            self.selection = selection;
            self.event_bus.emit(EditorEvent::SelectionChanged(selection));
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    // --- Commands ---

    /// Paint `region`, or the current selection, with an opaque color
    pub fn apply_fill(&mut self, color: &str, region: Option<Region>) -> EditorResult<()> {
        let Some(region) = self.target_region(region) else {
            return Ok(());
        };
        self.execute(Command::ApplyFill {
            region,
            color: color.to_string(),
        })
    }

    /// Blur `region`, or the current selection, at the configured strength
    pub fn apply_blur(&mut self, region: Option<Region>) -> EditorResult<()> {
        let Some(region) = self.target_region(region) else {
            return Ok(());
        };
        let strength = self.tools.tool_state().blur_settings.strength;
        self.execute(Command::ApplyBlur { region, strength })
    }

    /// Pixelate `region`, or the current selection, at the configured block size
    pub fn apply_mosaic(&mut self, region: Option<Region>) -> EditorResult<()> {
        let Some(region) = self.target_region(region) else {
            return Ok(());
        };
        let block_size = self.tools.tool_state().mosaic_settings.block_size;
        self.execute(Command::ApplyMosaic { region, block_size })
    }

    fn target_region(&self, region: Option<Region>) -> Option<Region> {
        let region = region.or(self.selection);
        if region.is_none() {
            log::debug!("No region selected, nothing to apply");
        }
        region
    }

    pub fn resize(&mut self, width: u32, height: u32) -> EditorResult<()> {
        if width > canvas::MAX_WIDTH || height > canvas::MAX_HEIGHT {
            return Err(EditorError::InvalidDimensions { width, height });
        }
        self.execute(Command::Resize { width, height })?;
        self.set_selection(None);
        if let Some(state) = &self.current {
            let (width, height) = (state.width, state.height);
            self.seed_resize_settings(width, height);
        }
        Ok(())
    }

    /// Resize to the dimensions held in the resize tool settings
    pub fn resize_to_target(&mut self) -> EditorResult<()> {
        let target = self.tools.tool_state().resize_settings;
        self.resize(target.width, target.height)
    }

    /// Run `command` against the current image and record the result in history
    pub fn execute(&mut self, command: Command) -> EditorResult<()> {
        let state = self.current.as_ref().ok_or(EditorError::NoPixelData)?;
        let next = command.execute(state)?;
        let description = command.description();
        self.history.push(&next, description.clone());
        self.current = Some(next);

        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Modified { description }));
        self.emit_history();
        Ok(())
    }

    // --- History ---

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo() else {
            return false;
        };
        self.replace_current(state);
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo() else {
            return false;
        };
        self.replace_current(state);
        true
    }

    fn replace_current(&mut self, state: ImageState) {
        self.tools.cancel_all();
        self.seed_resize_settings(state.width, state.height);
        let id = state.id;
        self.current = Some(state);
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Restored { id }));
        self.emit_history();
    }

    /// Point the resize target at the current image dimensions
    fn seed_resize_settings(&mut self, width: u32, height: u32) {
        self.tools.update_resize_settings(
            ResizeSettingsPatch {
                width: Some(width),
                height: Some(height),
                ..Default::default()
            },
            None,
        );
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_info(&self) -> HistoryInfo {
        self.history.history_info()
    }

    fn emit_history(&self) {
        self.event_bus
            .emit(EditorEvent::HistoryChanged(self.history.history_info()));
    }

    // --- Output ---

    fn pixels(&self) -> EditorResult<&PixelBuffer> {
        self.current
            .as_ref()
            .and_then(|state| state.pixels.as_ref())
            .ok_or(EditorError::NoPixelData)
    }

    /// Draw the current image onto `surface`, resizing it to fit first
    pub fn render(&self, surface: &mut dyn PixelSurface) -> EditorResult<()> {
        let pixels = self.pixels()?;
        if surface.size() != (pixels.width(), pixels.height()) {
            surface.set_size(pixels.width(), pixels.height())?;
        }
        surface.put_region(pixels, 0, 0);
        Ok(())
    }

    /// The current image with the in-progress stroke or arrow drawn on top
    pub fn preview(&self) -> EditorResult<PixelBuffer> {
        let pixels = self.pixels()?;
        let preview = match self.tools.active_tool() {
            ToolType::Pen => self
                .tools
                .current_path()
                .map(|path| effects::draw_path(pixels, path)),
            ToolType::Arrow => self
                .tools
                .current_arrow()
                .map(|arrow| effects::draw_arrow(pixels, arrow)),
            _ => None,
        };
        Ok(preview.unwrap_or_else(|| pixels.clone()))
    }

    /// Region being dragged right now, or the committed selection
    pub fn selection_preview(&self) -> Option<Region> {
        self.tools.current_selection().or(self.selection)
    }

    /// Encode the current image for download
    pub fn export(&self, format: ExportFormat) -> EditorResult<Vec<u8>> {
        file_handler::export_image(self.pixels()?, format, file::EXPORT_QUALITY)
    }

    /// Download name for the current image in `format`
    pub fn export_file_name(&self, format: ExportFormat) -> Option<String> {
        self.current.as_ref().map(|state| {
            file_handler::change_file_extension(&state.original_file_name, format.extension())
        })
    }

    // --- Sessions ---

    pub async fn save_session(&self) -> EditorResult<()> {
        let persistence = self.persistence.as_ref().ok_or_else(|| {
            EditorError::StorageUnavailable("no persistence configured".into())
        })?;
        let state = self.current.as_ref().ok_or(EditorError::NoPixelData)?;
        persistence.save_image_state(state).await?;
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Saved { id: state.id }));
        Ok(())
    }

    /// Reopen the most recently saved session. Returns false if there was none.
    pub async fn restore_latest_session(&mut self) -> bool {
        let Some(persistence) = self.persistence.as_ref() else {
            return false;
        };
        let Some(state) = persistence.latest_session().await else {
            return false;
        };
        match self.restore_state(state) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Discarding unusable saved session: {}", e);
                false
            }
        }
    }

    /// True when an image is open and the auto-save interval has elapsed
    pub fn autosave_due(&self) -> bool {
        match (&self.persistence, &self.current) {
            (Some(persistence), Some(_)) => {
                persistence.should_autosave(self.settings.auto_save_interval)
            }
            _ => false,
        }
    }
}
