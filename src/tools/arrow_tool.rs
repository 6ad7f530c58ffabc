use uuid::Uuid;

use crate::geometry::Point;
use crate::layer::Arrow;

use super::{Tool, ToolOutput, ToolState};

/// Two-point arrow capture. The end point follows the pointer until
/// the arrow is finalized.
#[derive(Debug, Default)]
pub struct ArrowTool {
    current: Option<Arrow>,
}

impl ArrowTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_arrow(&mut self, start: Point, color: &str, width: f32, head_size: f32) {
        self.current = Some(Arrow {
            id: Uuid::new_v4(),
            start,
            end: start,
            color: color.to_string(),
            width,
            head_size,
        });
    }

    /// Move the end point; ignored while idle
    pub fn update_arrow(&mut self, end: Point) {
        if let Some(arrow) = self.current.as_mut() {
            arrow.end = end;
        }
    }

    pub fn finalize_arrow(&mut self) -> Option<Arrow> {
        self.current.take()
    }

    pub fn current_arrow(&self) -> Option<&Arrow> {
        self.current.as_ref()
    }
}

impl Tool for ArrowTool {
    fn name(&self) -> &'static str {
        "Arrow"
    }

    fn on_pointer_down(&mut self, pos: Point, state: &ToolState) {
        let settings = &state.arrow_settings;
        self.start_arrow(pos, &settings.color, settings.width, settings.head_size);
    }

    fn on_pointer_move(&mut self, pos: Point) {
        self.update_arrow(pos);
    }

    fn on_pointer_up(&mut self, pos: Point) -> Option<ToolOutput> {
        self.update_arrow(pos);
        self.finalize_arrow().map(ToolOutput::Arrow)
    }

    fn cancel(&mut self) {
        self.current = None;
    }

    fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
