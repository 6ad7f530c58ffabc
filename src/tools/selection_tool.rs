use crate::geometry::{Point, Region};

use super::{Tool, ToolOutput, ToolState};

/// Rectangular region selection by dragging between two corners
#[derive(Debug, Default)]
pub struct SelectionTool {
    anchor: Option<Point>,
    cursor: Point,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_selection(&mut self, point: Point) {
        self.anchor = Some(point);
        self.cursor = point;
    }

    /// Move the free corner; ignored while idle
    pub fn update_selection(&mut self, point: Point) {
        if self.anchor.is_some() {
            self.cursor = point;
        }
    }

    /// Normalized region spanned so far, if a drag is in progress
    pub fn current_selection(&self) -> Option<Region> {
        self.anchor
            .map(|anchor| Region::from_corners(anchor, self.cursor))
    }

    /// End the drag and return the normalized region
    pub fn finalize_selection(&mut self) -> Option<Region> {
        let region = self.current_selection();
        self.anchor = None;
        region
    }

    pub fn cancel_selection(&mut self) {
        self.anchor = None;
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn on_pointer_down(&mut self, pos: Point, _state: &ToolState) {
        self.start_selection(pos);
    }

    fn on_pointer_move(&mut self, pos: Point) {
        self.update_selection(pos);
    }

    fn on_pointer_up(&mut self, pos: Point) -> Option<ToolOutput> {
        self.update_selection(pos);
        self.finalize_selection().map(ToolOutput::Region)
    }

    fn cancel(&mut self) {
        self.cancel_selection();
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_drag_is_normalized() {
        let mut tool = SelectionTool::new();
        tool.start_selection(Point::new(10.0, 10.0));
        tool.update_selection(Point::new(4.0, 2.0));

        let region = tool.finalize_selection().unwrap();
        assert_eq!(region, Region::new(4.0, 2.0, 6.0, 8.0));
        assert!(!tool.is_active());
    }

    #[test]
    fn test_cancel_discards_drag() {
        let mut tool = SelectionTool::new();
        tool.start_selection(Point::new(1.0, 1.0));
        tool.cancel_selection();
        assert!(tool.finalize_selection().is_none());
    }
}
