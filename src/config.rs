use serde::{Deserialize, Serialize};

/// Key under which [`AppSettings`] are stored
pub const SETTINGS_KEY: &str = "bta_settings";
/// Key holding the id of the most recently saved image
pub const LAST_SESSION_ID_KEY: &str = "bta_last_session_id";

pub mod file {
    pub const ALLOWED_TYPES: &[&str] = &[
        "image/png",
        "image/jpeg",
        "image/jpg",
        "image/gif",
        "image/webp",
    ];
    pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    pub const EXPORT_FORMAT: &str = "image/png";
    pub const EXPORT_QUALITY: f32 = 0.95;
}

pub mod canvas {
    pub const MAX_WIDTH: u32 = 4096;
    pub const MAX_HEIGHT: u32 = 4096;
}

/// Inclusive bounds for tool settings
pub mod limits {
    pub const PEN_WIDTH: (f32, f32) = (1.0, 20.0);
    pub const ARROW_WIDTH: (f32, f32) = (1.0, 10.0);
    pub const ARROW_HEAD_SIZE: (f32, f32) = (5.0, 30.0);
    pub const BLUR_STRENGTH: (f32, f32) = (1.0, 20.0);
    pub const MOSAIC_BLOCK_SIZE: (u32, u32) = (4, 32);
}

pub const DEFAULT_PEN_COLOR: &str = "#ff0000";
pub const DEFAULT_ARROW_COLOR: &str = "#ff0000";

/// User-level settings persisted between sessions.
///
/// Missing keys in stored JSON fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Milliseconds between automatic saves
    pub auto_save_interval: u64,
    pub max_history_size: usize,
    pub default_pen_color: String,
    pub default_pen_width: f32,
    pub default_arrow_color: String,
    pub default_arrow_width: f32,
    pub default_arrow_head_size: f32,
    pub default_blur_strength: f32,
    pub default_mosaic_block_size: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_save_interval: 30_000,
            max_history_size: 30,
            default_pen_color: DEFAULT_PEN_COLOR.to_string(),
            default_pen_width: 3.0,
            default_arrow_color: DEFAULT_ARROW_COLOR.to_string(),
            default_arrow_width: 3.0,
            default_arrow_head_size: 10.0,
            default_blur_strength: 10.0,
            default_mosaic_block_size: 10,
        }
    }
}
