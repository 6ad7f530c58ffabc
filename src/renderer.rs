use crate::config::canvas;
use crate::error::{EditorError, EditorResult};
use crate::pixel_buffer::PixelBuffer;

/// A 2D raster the editor can read from and draw into.
///
/// Reads outside the surface yield transparent pixels and writes are
/// clipped to it.
pub trait PixelSurface {
    /// Current size in pixels
    fn size(&self) -> (u32, u32);

    /// Resize the surface, clearing its contents
    fn set_size(&mut self, width: u32, height: u32) -> EditorResult<()>;

    /// Copy out a block whose top-left corner is `(x, y)`
    fn get_region(&self, x: i64, y: i64, width: u32, height: u32) -> PixelBuffer;

    /// Paste `buffer` with its top-left corner at `(x, y)`
    fn put_region(&mut self, buffer: &PixelBuffer, x: i64, y: i64);

    /// Allocate a transparent buffer compatible with this surface
    fn create_buffer(&self, width: u32, height: u32) -> EditorResult<PixelBuffer> {
        check_size(width, height)?;
        Ok(PixelBuffer::new(width, height))
    }
}

fn check_size(width: u32, height: u32) -> EditorResult<()> {
    if width == 0 || height == 0 {
        return Err(EditorError::SurfaceUnavailable(format!(
            "cannot allocate an empty {}x{} surface",
            width, height
        )));
    }
    if width > canvas::MAX_WIDTH || height > canvas::MAX_HEIGHT {
        return Err(EditorError::SurfaceUnavailable(format!(
            "{}x{} exceeds the {}x{} limit",
            width,
            height,
            canvas::MAX_WIDTH,
            canvas::MAX_HEIGHT
        )));
    }
    Ok(())
}

/// In-memory [`PixelSurface`]
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    buffer: PixelBuffer,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        check_size(width, height)?;
        Ok(Self {
            buffer: PixelBuffer::new(width, height),
        })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

impl PixelSurface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.buffer.width(), self.buffer.height())
    }

    fn set_size(&mut self, width: u32, height: u32) -> EditorResult<()> {
        check_size(width, height)?;
        self.buffer = PixelBuffer::new(width, height);
        Ok(())
    }

    fn get_region(&self, x: i64, y: i64, width: u32, height: u32) -> PixelBuffer {
        self.buffer.get_region(x, y, width, height)
    }

    fn put_region(&mut self, buffer: &PixelBuffer, x: i64, y: i64) {
        self.buffer.put_region(buffer, x, y);
    }
}
