use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Row-major RGBA raster, 8 bits per channel.
///
/// The byte vector always holds exactly `width * height * 4` values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        PixelBuffer::new(0, 0)
    }
}

impl PixelBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Buffer with every pixel set to `rgba`
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self { width, height, data }
    }

    /// Wrap raw RGBA bytes, `None` if the length does not match the dimensions
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Pixel at `(x, y)`, `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the buffer
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Copy a `width` x `height` block starting at `(x, y)`.
    ///
    /// Parts of the block outside this buffer read as transparent.
    pub fn get_region(&self, x: i64, y: i64, width: u32, height: u32) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height);
        let src_x0 = x.max(0);
        let src_y0 = y.max(0);
        let src_x1 = (x + width as i64).min(self.width as i64);
        let src_y1 = (y + height as i64).min(self.height as i64);
        if src_x1 <= src_x0 || src_y1 <= src_y0 {
            return out;
        }

        let row_bytes = (src_x1 - src_x0) as usize * 4;
        for sy in src_y0..src_y1 {
            let src = self.index(src_x0 as u32, sy as u32);
            let dst = out.index((src_x0 - x) as u32, (sy - y) as u32);
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Paste `source` with its top-left corner at `(x, y)`, clipping whatever
    /// falls outside this buffer
    pub fn put_region(&mut self, source: &PixelBuffer, x: i64, y: i64) {
        let dst_x0 = x.max(0);
        let dst_y0 = y.max(0);
        let dst_x1 = (x + source.width as i64).min(self.width as i64);
        let dst_y1 = (y + source.height as i64).min(self.height as i64);
        if dst_x1 <= dst_x0 || dst_y1 <= dst_y0 {
            return;
        }

        let row_bytes = (dst_x1 - dst_x0) as usize * 4;
        for dy in dst_y0..dst_y1 {
            let src = source.index((dst_x0 - x) as u32, (dy - y) as u32);
            let dst = self.index(dst_x0 as u32, dy as u32);
            self.data[dst..dst + row_bytes].copy_from_slice(&source.data[src..src + row_bytes]);
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        // Length is an invariant of PixelBuffer, so this never falls back
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
