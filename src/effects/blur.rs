use rayon::prelude::*;

use crate::geometry::{Region, clip_to_bounds};
use crate::pixel_buffer::PixelBuffer;

/// Blur the pixels inside `region` with a Gaussian of radius `strength`.
///
/// The clipped region is lifted into its own buffer before blurring, so
/// edge samples clamp to pixels inside the region and nothing outside it is
/// read or written.
pub fn apply_blur(buffer: &PixelBuffer, region: Region, strength: f32) -> PixelBuffer {
    let mut result = buffer.clone();
    let Some(rect) = clip_to_bounds(region, buffer.width(), buffer.height()) else {
        return result;
    };

    let sub = buffer.get_region(rect.x0 as i64, rect.y0 as i64, rect.width(), rect.height());
    let blurred = gaussian_blur(&sub, strength);
    result.put_region(&blurred, rect.x0 as i64, rect.y0 as i64);
    result
}

/// 1-D Gaussian kernel truncated at ceil(3*sigma) and at `max_radius`,
/// normalized to sum to one
fn build_kernel(sigma: f32, max_radius: usize) -> Vec<f32> {
    let radius = ((sigma * 3.0).ceil() as usize).min(max_radius);
    if radius == 0 {
        return vec![1.0];
    }
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..radius * 2 + 1)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Separable Gaussian blur over a whole buffer with clamp-to-edge sampling.
///
/// Rows are processed in parallel; each output value depends only on the
/// previous pass, so the result matches a sequential run exactly.
pub fn gaussian_blur(source: &PixelBuffer, sigma: f32) -> PixelBuffer {
    let w = source.width() as usize;
    let h = source.height() as usize;
    if w == 0 || h == 0 || sigma.is_nan() || sigma <= 0.0 || sigma.is_infinite() {
        return source.clone();
    }

    // Taps beyond the larger side only re-sample the clamped edge
    let kernel = build_kernel(sigma, w.max(h));
    let radius = (kernel.len() / 2) as isize;
    let stride = w * 4;
    let input: Vec<f32> = source.as_bytes().iter().map(|&b| b as f32).collect();

    let mut horizontal = vec![0.0f32; w * h * 4];
    horizontal
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &input[y * stride..(y + 1) * stride];
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                    let si = sx * 4;
                    for c in 0..4 {
                        acc[c] += row_in[si + c] * weight;
                    }
                }
                row_out[x * 4..x * 4 + 4].copy_from_slice(&acc);
            }
        });

    let mut output = vec![0u8; w * h * 4];
    output
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
                    let si = sy * stride + x * 4;
                    for c in 0..4 {
                        acc[c] += horizontal[si + c] * weight;
                    }
                }
                for c in 0..4 {
                    row_out[x * 4 + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    PixelBuffer::from_raw(source.width(), source.height(), output).unwrap_or_else(|| source.clone())
}
