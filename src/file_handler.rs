//! Turning user files into image states and rasters back into files.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::config::{canvas, file};
use crate::document::ImageState;
use crate::error::{EditorError, EditorResult, InvalidFileReason};
use crate::pixel_buffer::PixelBuffer;

/// A file handed to the editor: name, MIME type and raw contents
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Build a file record, inferring the MIME type from the extension when
    /// `mime` is empty
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mut mime = mime.into();
        if mime.is_empty() {
            mime = mime_from_extension(&name).unwrap_or_default().to_string();
        }
        Self { name, mime, bytes }
    }

    /// Read a file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> EditorResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            log::error!("Failed to read image file: {}: {}", path.display(), e);
            EditorError::DecodeFailure(e.to_string())
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_owned());
        Ok(Self::new(name, "", bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Check the MIME allow-list, then the size limit
pub fn validate_image_file(image_file: &ImageFile) -> EditorResult<()> {
    let invalid = |reason| EditorError::InvalidFile {
        reason,
        mime: image_file.mime.clone(),
        size: image_file.size(),
    };
    if !file::ALLOWED_TYPES.contains(&image_file.mime.as_str()) {
        return Err(invalid(InvalidFileReason::UnsupportedType));
    }
    if image_file.size() > file::MAX_FILE_SIZE {
        return Err(invalid(InvalidFileReason::TooLarge));
    }
    Ok(())
}

/// Decode encoded image bytes into an RGBA buffer
pub fn decode_image(bytes: &[u8]) -> EditorResult<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|err| {
        log::error!("Failed to decode image: {}", err);
        EditorError::DecodeFailure(err.to_string())
    })?;
    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());

    if img.width() == 0 || img.height() == 0 {
        return Err(EditorError::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        });
    }
    if img.width() > canvas::MAX_WIDTH || img.height() > canvas::MAX_HEIGHT {
        return Err(EditorError::SurfaceUnavailable(format!(
            "{}x{} exceeds the {}x{} canvas limit",
            img.width(),
            img.height(),
            canvas::MAX_WIDTH,
            canvas::MAX_HEIGHT
        )));
    }
    Ok(PixelBuffer::from_rgba_image(img.to_rgba8()))
}

/// Validate and decode a file into a fresh image state with no layers
pub fn load_image(image_file: &ImageFile) -> EditorResult<ImageState> {
    validate_image_file(image_file)?;
    log::info!(
        "Processing image from memory: {} ({} bytes)",
        image_file.name,
        image_file.size()
    );
    let pixels = decode_image(&image_file.bytes)?;
    Ok(ImageState::new(image_file.name.clone(), pixels))
}

/// Output encodings supported by [`export_image`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl ExportFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ExportFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ExportFormat::Jpeg),
            "image/webp" => Some(ExportFormat::WebP),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::WebP => "webp",
        }
    }
}

/// Lossless PNG encoding of a buffer
pub fn encode_png(buffer: &PixelBuffer) -> EditorResult<Vec<u8>> {
    export_image(buffer, ExportFormat::Png, file::EXPORT_QUALITY)
}

/// Encode a buffer for download.
///
/// `quality` in `0..=1` only affects JPEG; alpha is dropped there.
pub fn export_image(buffer: &PixelBuffer, format: ExportFormat, quality: f32) -> EditorResult<Vec<u8>> {
    if buffer.is_empty() {
        return Err(EditorError::ExportFailure("image has no pixels".into()));
    }
    let (width, height) = (buffer.width(), buffer.height());
    let mut out = Cursor::new(Vec::new());

    let result = match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(buffer.as_bytes(), width, height, ExtendedColorType::Rgba8)
        }
        ExportFormat::Jpeg => {
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            let rgb = DynamicImage::ImageRgba8(buffer.to_rgba_image()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        ExportFormat::WebP => WebPEncoder::new_lossless(&mut out).write_image(
            buffer.as_bytes(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|err| {
        log::error!("Failed to export image: {}", err);
        EditorError::ExportFailure(err.to_string())
    })?;

    let bytes = out.into_inner();
    if bytes.is_empty() {
        return Err(EditorError::ExportFailure("encoder produced no data".into()));
    }
    log::info!("Exported {}x{} image as {} ({} bytes)", width, height, format.mime(), bytes.len());
    Ok(bytes)
}

/// Replace everything after the last dot (a leading dot does not count)
pub fn change_file_extension(file_name: &str, new_extension: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    };
    format!("{}.{}", stem, new_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_file_extension() {
        assert_eq!(change_file_extension("photo.jpeg", "png"), "photo.png");
        assert_eq!(change_file_extension("archive.tar.gz", "png"), "archive.tar.png");
        assert_eq!(change_file_extension(".hidden", "png"), ".hidden.png");
        assert_eq!(change_file_extension("noext", "png"), "noext.png");
    }

    #[test]
    fn test_mime_inferred_from_extension() {
        assert_eq!(ImageFile::new("a.JPG", "", vec![]).mime, "image/jpeg");
        assert_eq!(ImageFile::new("a.txt", "", vec![]).mime, "");
        assert_eq!(ImageFile::new("a.png", "image/gif", vec![]).mime, "image/gif");
    }

    #[test]
    fn test_validation_order() {
        let big = ImageFile::new("a.bmp", "image/bmp", vec![0; 16]);
        assert!(matches!(
            validate_image_file(&big),
            Err(EditorError::InvalidFile {
                reason: InvalidFileReason::UnsupportedType,
                ..
            })
        ));

        let too_large = ImageFile::new("a.png", "image/png", vec![0; file::MAX_FILE_SIZE as usize + 1]);
        assert!(matches!(
            validate_image_file(&too_large),
            Err(EditorError::InvalidFile {
                reason: InvalidFileReason::TooLarge,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(EditorError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_png_round_trip() {
        let buffer = PixelBuffer::filled(3, 2, [10, 20, 30, 255]);
        let bytes = encode_png(&buffer).unwrap();
        assert_eq!(decode_image(&bytes).unwrap(), buffer);
    }
}
