use uuid::Uuid;

use crate::command::HistoryInfo;
use crate::geometry::Region;
use crate::tools::ToolType;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: ToolType,
        new: ToolType,
    },
    /// `None` when the selection was cleared
    SelectionChanged(Option<Region>),
    DocumentChanged(DocumentEvent),
    HistoryChanged(HistoryInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Loaded { id: Uuid, width: u32, height: u32 },
    /// A command was applied to the current image
    Modified { description: String },
    /// The current image was replaced by an undo, redo or restore
    Restored { id: Uuid },
    Saved { id: Uuid },
}
