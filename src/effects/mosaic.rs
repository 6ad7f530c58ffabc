use crate::geometry::{Region, clip_to_bounds};
use crate::pixel_buffer::PixelBuffer;

/// Pixelate `region` into `block_size` squares of their average color.
///
/// Cells on the right and bottom edge shrink to the remaining extent. All
/// four channels are averaged independently with integer division.
pub fn apply_mosaic(buffer: &PixelBuffer, region: Region, block_size: u32) -> PixelBuffer {
    let mut result = buffer.clone();
    let Some(rect) = clip_to_bounds(region, buffer.width(), buffer.height()) else {
        return result;
    };
    let block_size = block_size.clamp(1, rect.width().max(rect.height()));
    let stride = buffer.width() as usize * 4;
    let data = result.as_bytes_mut();

    let mut cell_y = rect.y0;
    while cell_y < rect.y1 {
        let cell_h = block_size.min(rect.y1 - cell_y);
        let mut cell_x = rect.x0;
        while cell_x < rect.x1 {
            let cell_w = block_size.min(rect.x1 - cell_x);

            let mut sums = [0u64; 4];
            for y in cell_y..cell_y + cell_h {
                let row = y as usize * stride;
                for x in cell_x..cell_x + cell_w {
                    let i = row + x as usize * 4;
                    for c in 0..4 {
                        sums[c] += data[i + c] as u64;
                    }
                }
            }

            let count = cell_w as u64 * cell_h as u64;
            let mean = sums.map(|sum| (sum / count) as u8);

            for y in cell_y..cell_y + cell_h {
                let row = y as usize * stride;
                for x in cell_x..cell_x + cell_w {
                    let i = row + x as usize * 4;
                    data[i..i + 4].copy_from_slice(&mean);
                }
            }

            cell_x = cell_x.saturating_add(block_size);
        }
        cell_y = cell_y.saturating_add(block_size);
    }

    result
}
