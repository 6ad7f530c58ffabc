use crate::geometry::{Region, clip_to_bounds};
use crate::pixel_buffer::PixelBuffer;
use crate::util::color::resolve_color;

/// Paint `region` with `color` at full opacity.
///
/// The color's own alpha is ignored; filled pixels always get alpha 255.
pub fn apply_fill(buffer: &PixelBuffer, region: Region, color: &str) -> PixelBuffer {
    let mut result = buffer.clone();
    let Some(rect) = clip_to_bounds(region, buffer.width(), buffer.height()) else {
        return result;
    };

    let [r, g, b, _] = resolve_color(color);
    let rgba = [r, g, b, 255];
    let stride = buffer.width() as usize * 4;
    let data = result.as_bytes_mut();

    for y in rect.y0..rect.y1 {
        let row = y as usize * stride;
        for x in rect.x0..rect.x1 {
            let i = row + x as usize * 4;
            data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    result
}
