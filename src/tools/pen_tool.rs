use crate::geometry::Point;
use crate::layer::Path;

use super::{Tool, ToolOutput, ToolState};

/// Freehand stroke capture.
///
/// Holds at most one in-progress path; ending the stroke hands it back and
/// clears the tool.
#[derive(Debug, Default)]
pub struct PenTool {
    current: Option<Path>,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a stroke with the given color and width
    pub fn start_stroke(&mut self, point: Point, color: &str, width: f32) {
        if self.current.is_some() {
            log::debug!("Pen stroke restarted before the previous one ended");
        }
        self.current = Some(Path::new(point, color, width));
    }

    /// Append a point; ignored while idle
    pub fn continue_stroke(&mut self, point: Point) {
        if let Some(path) = self.current.as_mut() {
            path.points.push(point);
        }
    }

    /// Finish the stroke and return it
    pub fn end_stroke(&mut self) -> Option<Path> {
        self.current.take()
    }

    /// The stroke being drawn, for live preview
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref()
    }
}

impl Tool for PenTool {
    fn name(&self) -> &'static str {
        "Pen"
    }

    fn on_pointer_down(&mut self, pos: Point, state: &ToolState) {
        let settings = &state.pen_settings;
        self.start_stroke(pos, &settings.color, settings.width);
    }

    fn on_pointer_move(&mut self, pos: Point) {
        self.continue_stroke(pos);
    }

    fn on_pointer_up(&mut self, pos: Point) -> Option<ToolOutput> {
        let last = self.current.as_ref().and_then(|path| path.points.last().copied());
        if last.is_some_and(|last| last != pos) {
            self.continue_stroke(pos);
        }
        self.end_stroke().map(ToolOutput::Path)
    }

    fn cancel(&mut self) {
        self.current = None;
    }

    fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
