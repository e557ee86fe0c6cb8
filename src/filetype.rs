//! File type classification for served note assets.
//!
//! Classification is by extension only, matching what the byte-serving
//! endpoint advertises as `Content-Type`.

use std::path::Path;

/// Content type for anything not recognized.
const OCTET_STREAM: &str = "application/octet-stream";

/// Asset classification for a note vault file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Markdown note
    Markdown,
    /// Image file (raster or vector)
    Image(ImageFormat),
    /// Anything else, served as raw bytes
    Other,
}

/// Image formats the viewer displays inline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics with transparency
    Png,
    /// JPEG compressed image (no transparency)
    Jpeg,
    /// Graphics Interchange Format with animation support
    Gif,
    /// Scalable Vector Graphics (XML based)
    Svg,
    /// WebP format with transparency and animation
    Webp,
}

impl ImageFormat {
    /// MIME type for responses and data URLs
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
        }
    }
}

impl FileType {
    /// MIME type served for this file type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Markdown => "text/markdown",
            Self::Image(format) => format.mime_type(),
            Self::Other => OCTET_STREAM,
        }
    }
}

/// Classifies a file by its extension (case insensitive).
///
/// # Examples
///
/// ```
/// use vaultmark::{FileType, ImageFormat, detect_file_type};
/// use std::path::Path;
///
/// assert_eq!(detect_file_type(Path::new("a.PNG")), FileType::Image(ImageFormat::Png));
/// assert_eq!(detect_file_type(Path::new("notes.md")), FileType::Markdown);
/// assert_eq!(detect_file_type(Path::new("archive.zip")), FileType::Other);
/// ```
pub fn detect_file_type(path: &Path) -> FileType {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileType::Other;
    };

    match ext.to_lowercase().as_str() {
        "pdf" => FileType::Pdf,
        "md" | "markdown" => FileType::Markdown,
        "png" => FileType::Image(ImageFormat::Png),
        "jpg" | "jpeg" => FileType::Image(ImageFormat::Jpeg),
        "gif" => FileType::Image(ImageFormat::Gif),
        "svg" => FileType::Image(ImageFormat::Svg),
        "webp" => FileType::Image(ImageFormat::Webp),
        _ => FileType::Other,
    }
}

/// Returns the `Content-Type` for a file path.
pub fn content_type(path: &Path) -> &'static str {
    detect_file_type(path).mime_type()
}
