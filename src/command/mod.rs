mod commands;
mod history;

pub use commands::Command;
pub use history::{HistoryEntry, HistoryInfo, HistoryManager};

use crate::document::ImageState;
use crate::error::EditorResult;

/// Result type for command execution: the new snapshot produced by the command
pub type CommandResult = EditorResult<ImageState>;
