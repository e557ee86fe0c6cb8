//! Local asset lookup and image inlining.
//!
//! Mirrors the lookup rules of the byte-serving endpoint: a path is served
//! as is when it exists, otherwise from the `img` folder next to its parent
//! folder. Inlining uses the same rules to embed images as `data:` URLs so a
//! rendered note can be viewed without the endpoint.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::filetype::content_type;
use crate::markdown::logical_path_from_src;

/// Fallback folder for attachments.
const FALLBACK_DIR: &str = "img";

const IMG_OPEN: &str = "<img ";
const SRC_ATTR: &str = "src=\"";

/// Finds the file served for a logical path.
///
/// Tries the literal path, then `<parent of parent>/img/<file name>`.
///
/// # Returns
///
/// Existing file path, or `None` when neither location has the file
pub fn locate_asset(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let file_name = path.file_name()?;
    let grandparent = path.parent()?.parent()?;
    let fallback = grandparent.join(FALLBACK_DIR).join(file_name);

    fallback.is_file().then_some(fallback)
}

/// Reads a located asset into a `data:` URL.
///
/// # Errors
///
/// Returns error if the file cannot be read
pub fn data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read asset: {}", path.display()))?;

    Ok(format!(
        "data:{};base64,{}",
        content_type(path),
        STANDARD.encode(bytes)
    ))
}

/// Rewrites local `<img>` sources into `data:` URLs.
///
/// Each image source is mapped back to its logical path (endpoint hrefs
/// and plain paths are both understood), located with [`locate_asset`] and
/// embedded. Relative logical paths are also looked up under each of
/// `search_dirs`, in order. Network sources and images that cannot be found
/// keep their original `src`.
///
/// # Arguments
///
/// * `html`: Rendered HTML
/// * `endpoint`: Byte-serving endpoint used when rendering, if any
/// * `search_dirs`: Extra folders for relative paths
///
/// # Returns
///
/// HTML with local images inlined
pub fn inline_images(html: &str, endpoint: Option<&str>, search_dirs: &[PathBuf]) -> String {
    let mut result = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(found) = html[pos..].find(IMG_OPEN) {
        let tag_start = pos + found;

        let Some(attr_offset) = html[tag_start..].find(SRC_ATTR) else {
            break;
        };
        let value_start = tag_start + attr_offset + SRC_ATTR.len();

        let Some(value_len) = html[value_start..].find('"') else {
            break;
        };
        let value_end = value_start + value_len;

        result.push_str(&html[pos..value_start]);

        let src = &html[value_start..value_end];
        match inline_source(&src.replace("&amp;", "&"), endpoint, search_dirs) {
            Some(url) => result.push_str(&url),
            None => result.push_str(src),
        }

        pos = value_end;
    }

    result.push_str(&html[pos..]);
    result
}

/// Resolves one image source to a data URL, if it points at a local file.
fn inline_source(src: &str, endpoint: Option<&str>, search_dirs: &[PathBuf]) -> Option<String> {
    let Some(logical) = logical_path_from_src(src, endpoint) else {
        debug!(src, "Skipping network image");
        return None;
    };
    let logical = Path::new(&*logical);

    let mut candidates = vec![logical.to_path_buf()];
    if logical.is_relative() {
        candidates.extend(search_dirs.iter().map(|dir| dir.join(logical)));
    }

    let Some(located) = candidates.iter().find_map(locate_asset) else {
        warn!(src, "Image not found, leaving source as is");
        return None;
    };

    match data_url(&located) {
        Ok(url) => {
            debug!(path = %located.display(), "Inlined image");
            Some(url)
        }
        Err(err) => {
            warn!(error = %format!("{:#}", err), "Failed to inline image");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

    fn write(dir: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Should create dirs");
        }
        fs::write(&path, bytes).expect("Should write file");
        path
    }

    #[test]
    fn test_locate_literal_path() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let path = write(dir.path(), "notes/a.png", PNG_BYTES);

        // Act
        let located = locate_asset(&path);

        // Assert
        assert_eq!(located, Some(path));
    }

    #[test]
    fn test_locate_falls_back_to_sibling_img_folder() {
        // Arrange: note at vault/notes/sub, image stored in vault/notes/img
        let dir = TempDir::new().expect("Should create temp dir");
        let stored = write(dir.path(), "notes/img/b.png", PNG_BYTES);
        let requested = dir.path().join("notes/sub/b.png");

        // Act
        let located = locate_asset(&requested);

        // Assert
        assert_eq!(located, Some(stored));
    }

    #[test]
    fn test_locate_missing() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");

        // Act
        let located = locate_asset(dir.path().join("notes/missing.png"));

        // Assert
        assert!(located.is_none(), "Missing file should not be located");
    }

    #[test]
    fn test_data_url_uses_content_type() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let path = write(dir.path(), "a.png", PNG_BYTES);

        // Act
        let url = data_url(&path).expect("Should encode");

        // Assert
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_inline_endpoint_src() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let path = write(dir.path(), "notes/a b.png", PNG_BYTES);
        let href = crate::markdown::asset_href("/api/file", &path.to_string_lossy());
        let html = format!("<p><img src=\"{}\" alt=\"a b.png\"></p>", href);

        // Act
        let inlined = inline_images(&html, Some("/api/file"), &[]);

        // Assert
        assert_eq!(
            inlined,
            "<p><img src=\"data:image/png;base64,iVBORw==\" alt=\"a b.png\"></p>"
        );
    }

    #[test]
    fn test_inline_relative_src_uses_search_dirs() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        write(dir.path(), "img/c.png", PNG_BYTES);
        let html = "<img src=\"c.png\" alt=\"c\">";

        // Act
        let inlined = inline_images(html, None, &[dir.path().join("img")]);

        // Assert
        assert!(
            inlined.contains("data:image/png;base64,"),
            "Should inline from search dir: {}",
            inlined
        );
    }

    #[test]
    fn test_inline_keeps_missing_and_network_sources() {
        // Arrange
        let html = "<img src=\"/nope/x.png\"><img src=\"https://example.com/y.png\">";

        // Act
        let inlined = inline_images(html, None, &[]);

        // Assert
        assert_eq!(inlined, html);
    }

    #[test]
    fn test_inline_without_images() {
        // Arrange
        let html = "<p>no images here</p>";

        // Act
        let inlined = inline_images(html, Some("/api/file"), &[]);

        // Assert
        assert_eq!(inlined, html);
    }
}
