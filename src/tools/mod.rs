//! Pointer-driven tool state machines and the manager that routes input
//! to whichever one is active.

mod arrow_tool;
mod pen_tool;
mod selection_tool;
mod settings;

pub use arrow_tool::ArrowTool;
pub use pen_tool::PenTool;
pub use selection_tool::SelectionTool;
pub use settings::{
    ArrowSettings, ArrowSettingsPatch, BlurSettings, BlurSettingsPatch, MosaicSettings,
    MosaicSettingsPatch, PenSettings, PenSettingsPatch, ResizeSettings, ResizeSettingsPatch,
    ToolState,
};

use serde::{Deserialize, Serialize};

use crate::config::AppSettings;
use crate::geometry::{Point, Region};
use crate::layer::{Arrow, Path};

/// Tools the editor can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Select,
    Pen,
    Arrow,
    Blur,
    Mosaic,
    Resize,
}

impl ToolType {
    pub fn name(&self) -> &'static str {
        match self {
            ToolType::Select => "Select",
            ToolType::Pen => "Pen",
            ToolType::Arrow => "Arrow",
            ToolType::Blur => "Blur",
            ToolType::Mosaic => "Mosaic",
            ToolType::Resize => "Resize",
        }
    }

    /// True for tools whose drag produces a region selection
    pub fn uses_selection(&self) -> bool {
        matches!(self, ToolType::Select | ToolType::Blur | ToolType::Mosaic)
    }
}

/// What a completed pointer gesture produced
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Path(Path),
    Arrow(Arrow),
    Region(Region),
}

/// Common interface of the pointer-driven tools.
///
/// A gesture is down, any number of moves, then up. Move and up are no-ops
/// when no gesture is in progress.
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Begin a gesture, reading whatever settings the tool needs
    fn on_pointer_down(&mut self, pos: Point, state: &ToolState);

    fn on_pointer_move(&mut self, pos: Point);

    /// Finish the gesture and hand back its result
    fn on_pointer_up(&mut self, pos: Point) -> Option<ToolOutput>;

    /// Drop any in-progress gesture
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Owns the tool settings and one instance of every tool state machine
#[derive(Debug, Default)]
pub struct ToolManager {
    state: ToolState,
    pen: PenTool,
    arrow: ArrowTool,
    selection: SelectionTool,
}

impl ToolManager {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            state: ToolState::from_settings(settings),
            ..Default::default()
        }
    }

    pub fn active_tool(&self) -> ToolType {
        self.state.active_tool
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.state
    }

    /// Switch tools, discarding any gesture in progress. Returns the previous tool.
    pub fn select_tool(&mut self, tool: ToolType) -> ToolType {
        let old = self.state.active_tool;
        if old != tool {
            log::debug!("Tool changed: {} -> {}", old.name(), tool.name());
        }
        self.cancel_all();
        self.state.active_tool = tool;
        old
    }

    /// Drop in-progress gestures on every tool
    pub fn cancel_all(&mut self) {
        self.pen.cancel();
        self.arrow.cancel();
        self.selection.cancel();
    }

    pub fn is_interacting(&self) -> bool {
        self.pen.is_active() || self.arrow.is_active() || self.selection.is_active()
    }

    pub fn update_pen_settings(&mut self, patch: PenSettingsPatch) {
        self.state.apply_pen(patch);
    }

    pub fn update_arrow_settings(&mut self, patch: ArrowSettingsPatch) {
        self.state.apply_arrow(patch);
    }

    pub fn update_blur_settings(&mut self, patch: BlurSettingsPatch) {
        self.state.apply_blur(patch);
    }

    pub fn update_mosaic_settings(&mut self, patch: MosaicSettingsPatch) {
        self.state.apply_mosaic(patch);
    }

    /// `source` is the current image size, used by the aspect-ratio lock
    pub fn update_resize_settings(&mut self, patch: ResizeSettingsPatch, source: Option<(u32, u32)>) {
        self.state.apply_resize(patch, source);
    }

    pub fn pointer_down(&mut self, pos: Point) {
        let state = &self.state;
        if let Some(tool) = route(state.active_tool, &mut self.pen, &mut self.arrow, &mut self.selection) {
            tool.on_pointer_down(pos, state);
        }
    }

    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(tool) = route(
            self.state.active_tool,
            &mut self.pen,
            &mut self.arrow,
            &mut self.selection,
        ) {
            tool.on_pointer_move(pos);
        }
    }

    pub fn pointer_up(&mut self, pos: Point) -> Option<ToolOutput> {
        route(
            self.state.active_tool,
            &mut self.pen,
            &mut self.arrow,
            &mut self.selection,
        )?
        .on_pointer_up(pos)
    }

    pub fn start_pen_stroke(&mut self, point: Point) {
        let settings = &self.state.pen_settings;
        self.pen.start_stroke(point, &settings.color, settings.width);
    }

    pub fn continue_pen_stroke(&mut self, point: Point) {
        self.pen.continue_stroke(point);
    }

    pub fn end_pen_stroke(&mut self) -> Option<Path> {
        self.pen.end_stroke()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.pen.current_path()
    }

    pub fn start_arrow(&mut self, start: Point) {
        let settings = &self.state.arrow_settings;
        self.arrow
            .start_arrow(start, &settings.color, settings.width, settings.head_size);
    }

    pub fn update_arrow(&mut self, end: Point) {
        self.arrow.update_arrow(end);
    }

    pub fn finalize_arrow(&mut self) -> Option<Arrow> {
        self.arrow.finalize_arrow()
    }

    pub fn current_arrow(&self) -> Option<&Arrow> {
        self.arrow.current_arrow()
    }

    pub fn start_selection(&mut self, point: Point) {
        self.selection.start_selection(point);
    }

    pub fn update_selection(&mut self, point: Point) {
        self.selection.update_selection(point);
    }

    pub fn finalize_selection(&mut self) -> Option<Region> {
        self.selection.finalize_selection()
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel_selection();
    }

    pub fn current_selection(&self) -> Option<Region> {
        self.selection.current_selection()
    }
}

/// State machine handling pointer input for `tool`, if any
fn route<'a>(
    tool: ToolType,
    pen: &'a mut PenTool,
    arrow: &'a mut ArrowTool,
    selection: &'a mut SelectionTool,
) -> Option<&'a mut dyn Tool> {
    match tool {
        ToolType::Pen => Some(pen as &mut dyn Tool),
        ToolType::Arrow => Some(arrow as &mut dyn Tool),
        ToolType::Select | ToolType::Blur | ToolType::Mosaic => Some(selection as &mut dyn Tool),
        ToolType::Resize => None,
    }
}
