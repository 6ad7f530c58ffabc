#![warn(clippy::all, rust_2018_idioms)]

pub mod command;
pub mod config;
pub mod document;
pub mod effects;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod layer;
pub mod pixel_buffer;
pub mod renderer;
pub mod state;
pub mod tools;
pub mod util;

pub use command::{Command, HistoryInfo, HistoryManager};
pub use config::AppSettings;
pub use document::ImageState;
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use file_handler::{ExportFormat, ImageFile};
pub use geometry::{Point, Region};
pub use layer::{Arrow, EffectRegion, Layer, LayerData, LayerType, Path};
pub use pixel_buffer::PixelBuffer;
pub use renderer::{Canvas, PixelSurface};
pub use state::{EditorContext, SharedEditor, StatePersistence};
pub use tools::{Tool, ToolManager, ToolType};
