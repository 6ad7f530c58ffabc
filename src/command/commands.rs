use crate::document::ImageState;
use crate::effects;
use crate::error::EditorError;
use crate::geometry::Region;
use crate::layer::{Arrow, EffectRegion, LayerType, Path};
use crate::pixel_buffer::PixelBuffer;
use crate::util::time;

use super::CommandResult;

/// Committed edits that turn one snapshot into the next
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Burn a finished pen stroke into the raster
    AddPath(Path),

    /// Burn a placed arrow into the raster
    AddArrow(Arrow),

    /// Pixelate a region
    ApplyMosaic { region: Region, block_size: u32 },

    /// Blur a region
    ApplyBlur { region: Region, strength: f32 },

    /// Paint a region with an opaque color
    ApplyFill { region: Region, color: String },

    /// Resample the whole image
    Resize { width: u32, height: u32 },
}

impl Command {
    /// Execute the command against `state`, returning a new snapshot.
    ///
    /// `state` itself is never modified.
    pub fn execute(&self, state: &ImageState) -> CommandResult {
        match self {
            Command::AddPath(path) => {
                let mut next = with_pixels(state, |pixels| effects::draw_path(pixels, path))?;
                next.layer_for(LayerType::Pen).add_path(path.clone());
                Ok(next)
            }
            Command::AddArrow(arrow) => {
                let mut next = with_pixels(state, |pixels| effects::draw_arrow(pixels, arrow))?;
                next.layer_for(LayerType::Arrow).add_arrow(arrow.clone());
                Ok(next)
            }
            Command::ApplyMosaic { region, block_size } => {
                let mut next = with_pixels(state, |pixels| {
                    effects::apply_mosaic(pixels, *region, *block_size)
                })?;
                next.layer_for(LayerType::Mosaic)
                    .add_region(EffectRegion::new(*region, *block_size as f32));
                Ok(next)
            }
            Command::ApplyBlur { region, strength } => {
                let mut next = with_pixels(state, |pixels| {
                    effects::apply_blur(pixels, *region, *strength)
                })?;
                next.layer_for(LayerType::Blur)
                    .add_region(EffectRegion::new(*region, *strength));
                Ok(next)
            }
            Command::ApplyFill { region, color } => {
                with_pixels(state, |pixels| effects::apply_fill(pixels, *region, color))
            }
            Command::Resize { width, height } => effects::resize(state, *width, *height),
        }
    }

    /// Label recorded with the history entry this command produces
    pub fn description(&self) -> String {
        match self {
            Command::AddPath(_) => "Pen stroke".to_string(),
            Command::AddArrow(_) => "Arrow".to_string(),
            Command::ApplyMosaic { .. } => "Mosaic".to_string(),
            Command::ApplyBlur { .. } => "Blur".to_string(),
            Command::ApplyFill { .. } => "Fill".to_string(),
            Command::Resize { width, height } => format!("Resize to {}x{}", width, height),
        }
    }
}

/// Copy of `state` whose raster is replaced by `effect` applied to the current one
fn with_pixels<F>(state: &ImageState, effect: F) -> CommandResult
where
    F: FnOnce(&PixelBuffer) -> PixelBuffer,
{
    let Some(pixels) = &state.pixels else {
        return Err(EditorError::NoPixelData);
    };
    let updated = effect(pixels);
    Ok(ImageState {
        id: state.id,
        original_file_name: state.original_file_name.clone(),
        width: updated.width(),
        height: updated.height(),
        pixels: Some(updated),
        layers: state.layers.clone(),
        last_modified: time::now(),
    })
}
