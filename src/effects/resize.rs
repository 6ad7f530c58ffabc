use image::imageops::{self, FilterType};

use crate::document::ImageState;
use crate::error::{EditorError, EditorResult};
use crate::pixel_buffer::PixelBuffer;

/// Resample a buffer with bicubic (Catmull-Rom) filtering
pub fn resize_buffer(buffer: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    if buffer.width() == new_width && buffer.height() == new_height {
        return buffer.clone();
    }
    let source = buffer.to_rgba_image();
    let resized = imageops::resize(&source, new_width, new_height, FilterType::CatmullRom);
    PixelBuffer::from_rgba_image(resized)
}

/// Produce a resized copy of `state`; layers are carried over untouched
pub fn resize(state: &ImageState, new_width: u32, new_height: u32) -> EditorResult<ImageState> {
    let Some(pixels) = &state.pixels else {
        return Err(EditorError::NoPixelData);
    };
    if new_width == 0 || new_height == 0 {
        return Err(EditorError::InvalidDimensions {
            width: new_width,
            height: new_height,
        });
    }

    log::debug!(
        "Resizing {} from {}x{} to {}x{}",
        state.id,
        state.width,
        state.height,
        new_width,
        new_height
    );

    let mut resized = state.clone();
    resized.set_pixels(resize_buffer(pixels, new_width, new_height));
    Ok(resized)
}
