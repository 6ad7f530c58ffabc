use serde::{Deserialize, Serialize};

use crate::config::{AppSettings, DEFAULT_ARROW_COLOR, DEFAULT_PEN_COLOR, canvas, limits};

use super::ToolType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenSettings {
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowSettings {
    pub color: String,
    pub width: f32,
    pub head_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurSettings {
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicSettings {
    pub block_size: u32,
}

/// Target dimensions for the resize tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeSettings {
    pub width: u32,
    pub height: u32,
    pub maintain_aspect_ratio: bool,
}

/// Active tool plus one settings record per tool kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolState {
    pub active_tool: ToolType,
    pub pen_settings: PenSettings,
    pub arrow_settings: ArrowSettings,
    pub blur_settings: BlurSettings,
    pub mosaic_settings: MosaicSettings,
    pub resize_settings: ResizeSettings,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

impl ToolState {
    /// Initial tool state seeded from the user's default settings
    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut state = Self {
            active_tool: ToolType::Select,
            pen_settings: PenSettings {
                color: DEFAULT_PEN_COLOR.to_string(),
                width: 3.0,
            },
            arrow_settings: ArrowSettings {
                color: DEFAULT_ARROW_COLOR.to_string(),
                width: 3.0,
                head_size: 10.0,
            },
            blur_settings: BlurSettings { strength: 10.0 },
            mosaic_settings: MosaicSettings { block_size: 10 },
            resize_settings: ResizeSettings {
                width: 0,
                height: 0,
                maintain_aspect_ratio: true,
            },
        };
        state.apply_pen(PenSettingsPatch {
            color: Some(settings.default_pen_color.clone()),
            width: Some(settings.default_pen_width),
        });
        state.apply_arrow(ArrowSettingsPatch {
            color: Some(settings.default_arrow_color.clone()),
            width: Some(settings.default_arrow_width),
            head_size: Some(settings.default_arrow_head_size),
        });
        state.apply_blur(BlurSettingsPatch {
            strength: Some(settings.default_blur_strength),
        });
        state.apply_mosaic(MosaicSettingsPatch {
            block_size: Some(settings.default_mosaic_block_size),
        });
        state
    }

    pub fn apply_pen(&mut self, patch: PenSettingsPatch) {
        if let Some(color) = patch.color {
            self.pen_settings.color = color;
        }
        if let Some(width) = patch.width {
            self.pen_settings.width = clamp_f32(width, limits::PEN_WIDTH);
        }
    }

    pub fn apply_arrow(&mut self, patch: ArrowSettingsPatch) {
        if let Some(color) = patch.color {
            self.arrow_settings.color = color;
        }
        if let Some(width) = patch.width {
            self.arrow_settings.width = clamp_f32(width, limits::ARROW_WIDTH);
        }
        if let Some(head_size) = patch.head_size {
            self.arrow_settings.head_size = clamp_f32(head_size, limits::ARROW_HEAD_SIZE);
        }
    }

    pub fn apply_blur(&mut self, patch: BlurSettingsPatch) {
        if let Some(strength) = patch.strength {
            self.blur_settings.strength = clamp_f32(strength, limits::BLUR_STRENGTH);
        }
    }

    pub fn apply_mosaic(&mut self, patch: MosaicSettingsPatch) {
        if let Some(block_size) = patch.block_size {
            let (min, max) = limits::MOSAIC_BLOCK_SIZE;
            self.mosaic_settings.block_size = block_size.clamp(min, max);
        }
    }

    /// Merge a resize patch.
    ///
    /// With the aspect lock on and `source` dimensions known, setting only
    /// one side recomputes the other from the source aspect ratio.
    pub fn apply_resize(&mut self, patch: ResizeSettingsPatch, source: Option<(u32, u32)>) {
        let resize = &mut self.resize_settings;
        if let Some(lock) = patch.maintain_aspect_ratio {
            resize.maintain_aspect_ratio = lock;
        }
        if let Some(width) = patch.width {
            resize.width = width.min(canvas::MAX_WIDTH);
        }
        if let Some(height) = patch.height {
            resize.height = height.min(canvas::MAX_HEIGHT);
        }

        let Some((source_w, source_h)) = source else {
            return;
        };
        if !resize.maintain_aspect_ratio || source_w == 0 || source_h == 0 {
            return;
        }
        match (patch.width, patch.height) {
            (Some(width), None) => {
                let scaled = (width as f64 * source_h as f64 / source_w as f64).round() as u32;
                resize.height = scaled.clamp(1, canvas::MAX_HEIGHT);
            }
            (None, Some(height)) => {
                let scaled = (height as f64 * source_w as f64 / source_h as f64).round() as u32;
                resize.width = scaled.clamp(1, canvas::MAX_WIDTH);
            }
            _ => {}
        }
    }
}

fn clamp_f32(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenSettingsPatch {
    pub color: Option<String>,
    pub width: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrowSettingsPatch {
    pub color: Option<String>,
    pub width: Option<f32>,
    pub head_size: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlurSettingsPatch {
    pub strength: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MosaicSettingsPatch {
    pub block_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeSettingsPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maintain_aspect_ratio: Option<bool>,
}
