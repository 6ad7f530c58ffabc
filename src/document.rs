use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::layer::{Layer, LayerType};
use crate::pixel_buffer::PixelBuffer;
use crate::util::time;

/// One complete, independently owned editor snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    pub id: Uuid,
    pub original_file_name: String,
    pub width: u32,
    pub height: u32,
    /// `None` only before an image has been loaded
    pub pixels: Option<PixelBuffer>,
    pub layers: Vec<Layer>,
    pub last_modified: DateTime<Utc>,
}

impl ImageState {
    /// Fresh state for a newly loaded raster
    pub fn new(original_file_name: impl Into<String>, pixels: PixelBuffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_file_name: original_file_name.into(),
            width: pixels.width(),
            height: pixels.height(),
            pixels: Some(pixels),
            layers: Vec::new(),
            last_modified: time::now(),
        }
    }

    /// Placeholder state with no raster yet
    pub fn empty(original_file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_file_name: original_file_name.into(),
            width: 0,
            height: 0,
            pixels: None,
            layers: Vec::new(),
            last_modified: time::now(),
        }
    }

    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    /// Pixel buffer matches the recorded dimensions, which are non-zero once loaded
    pub fn is_consistent(&self) -> bool {
        match &self.pixels {
            Some(buffer) => {
                self.width > 0
                    && self.height > 0
                    && buffer.width() == self.width
                    && buffer.height() == self.height
            }
            None => true,
        }
    }

    /// Replace the raster and bump the modification time
    pub fn set_pixels(&mut self, pixels: PixelBuffer) {
        self.width = pixels.width();
        self.height = pixels.height();
        self.pixels = Some(pixels);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_modified = time::now();
    }

    /// Most recent unlocked layer of the given type, created if absent
    pub fn layer_for(&mut self, layer_type: LayerType) -> &mut Layer {
        let existing = self
            .layers
            .iter()
            .rposition(|layer| layer.layer_type() == layer_type && !layer.locked);
        let index = match existing {
            Some(index) => index,
            None => {
                self.layers.push(Layer::new(layer_type));
                self.layers.len() - 1
            }
        };
        &mut self.layers[index]
    }
}
