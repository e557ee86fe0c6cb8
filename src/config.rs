//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::markdown::{DEFAULT_ENDPOINT, RenderOptions};

/// Command line configuration for Vaultmark.
#[derive(Debug, Clone, Parser)]
#[command(name = "vaultmark", version, about, long_about = None)]
pub struct Config {
    /// Markdown note to render
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder embed names resolve against (defaults to the note's folder)
    #[arg(long)]
    pub base_path: Option<PathBuf>,

    /// Attachment folder (defaults to <base-path>/img)
    #[arg(long)]
    pub assets_path: Option<PathBuf>,

    /// Byte-serving endpoint wrapped around local image paths
    #[arg(long, default_value = DEFAULT_ENDPOINT, conflicts_with = "raw_paths")]
    pub endpoint: String,

    /// Emit plain file paths instead of endpoint links
    #[arg(long)]
    pub raw_paths: bool,

    /// Highlight fenced code blocks
    #[arg(long)]
    pub highlight: bool,

    /// Wrap output in a complete HTML page
    #[arg(long)]
    pub standalone: bool,

    /// Page title for standalone output (defaults to the note's file stem)
    #[arg(long)]
    pub title: Option<String>,

    /// Embed local images as data URLs
    #[arg(long)]
    pub inline_images: bool,

    /// Open the output file after writing
    #[arg(long, requires = "output")]
    pub open: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file or an explicit folder does not exist.
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            bail!("Input file does not exist: {}", self.input.display());
        }

        if let Some(base) = &self.base_path
            && !base.is_dir()
        {
            bail!("Base path is not a directory: {}", base.display());
        }

        Ok(())
    }

    /// Folder embed names resolve against.
    pub fn base_path(&self) -> PathBuf {
        if let Some(base) = &self.base_path {
            return base.clone();
        }

        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Attachment folder of the note.
    pub fn assets_path(&self) -> PathBuf {
        self.assets_path
            .clone()
            .unwrap_or_else(|| self.base_path().join("img"))
    }

    /// Byte-serving endpoint, `None` when raw paths were requested.
    pub fn endpoint(&self) -> Option<&str> {
        (!self.raw_paths).then_some(self.endpoint.as_str())
    }

    /// Builds renderer options from command line flags.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(path_string(&self.base_path()))
            .with_assets_path(path_string(&self.assets_path()))
            .with_endpoint(self.endpoint().map(String::from))
            .with_highlighting(self.highlight)
    }

    /// Returns page title from configuration or the input file stem.
    ///
    /// # Errors
    ///
    /// Returns error if the input path has no file stem or contains invalid UTF8.
    pub fn title(&self) -> Result<String> {
        if let Some(title) = &self.title {
            return Ok(title.clone());
        }

        self.input
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Cannot extract title from path: {}", self.input.display()))
            .map(String::from)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(args: &[&str]) -> Config {
        let argv = std::iter::once("vaultmark").chain(args.iter().copied());
        Config::try_parse_from(argv).expect("Should parse arguments")
    }

    #[test]
    fn test_defaults_follow_input_folder() {
        // Arrange
        let config = config(&["/kb/notes/topic.md"]);

        // Act
        let options = config.render_options();

        // Assert
        assert_eq!(options.base_path, "/kb/notes");
        assert_eq!(options.assets_path, "/kb/notes/img");
        assert_eq!(options.endpoint.as_deref(), Some("/api/file"));
        assert!(!options.highlight);
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        // Arrange
        let config = config(&["topic.md"]);

        // Act
        let base = config.base_path();

        // Assert
        assert_eq!(base, PathBuf::from("."));
    }

    #[test]
    fn test_explicit_paths_and_raw_paths() {
        // Arrange
        let config = config(&[
            "note.md",
            "--base-path",
            "/vault",
            "--assets-path",
            "/vault/attachments",
            "--raw-paths",
            "--highlight",
        ]);

        // Act
        let options = config.render_options();

        // Assert
        assert_eq!(options.base_path, "/vault");
        assert_eq!(options.assets_path, "/vault/attachments");
        assert_eq!(options.endpoint, None);
        assert!(options.highlight);
    }

    #[test]
    fn test_custom_endpoint() {
        // Arrange
        let config = config(&["note.md", "--endpoint", "/files"]);

        // Act
        let endpoint = config.endpoint();

        // Assert
        assert_eq!(endpoint, Some("/files"));
    }

    #[test]
    fn test_endpoint_conflicts_with_raw_paths() {
        // Act
        let result =
            Config::try_parse_from(["vaultmark", "note.md", "--endpoint", "/x", "--raw-paths"]);

        // Assert
        assert!(result.is_err(), "Conflicting flags should be rejected");
    }

    #[test]
    fn test_open_requires_output() {
        // Act
        let result = Config::try_parse_from(["vaultmark", "note.md", "--open"]);

        // Assert
        assert!(result.is_err(), "--open without --output should be rejected");
    }

    #[test]
    fn test_title_from_stem_or_flag() {
        // Arrange
        let implicit = config(&["/kb/My Note.md"]);
        let explicit = config(&["/kb/My Note.md", "--title", "Custom"]);

        // Act & Assert
        assert_eq!(implicit.title().expect("Should derive title"), "My Note");
        assert_eq!(explicit.title().expect("Should use flag"), "Custom");
    }

    #[test]
    fn test_validate_existing_input() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let input = dir.path().join("note.md");
        std::fs::write(&input, "# Note").expect("Should write note");
        let config = config(&[input.to_str().expect("UTF-8 path")]);

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_ok(), "Existing input should validate");
    }

    #[test]
    fn test_validate_missing_input() {
        // Arrange
        let config = config(&["/nonexistent/path/note.md"]);

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Input file does not exist"));
    }

    #[test]
    fn test_validate_missing_base_path() {
        // Arrange
        let dir = TempDir::new().expect("Should create temp dir");
        let input = dir.path().join("note.md");
        std::fs::write(&input, "text").expect("Should write note");
        let config = config(&[
            input.to_str().expect("UTF-8 path"),
            "--base-path",
            "/nonexistent/vault",
        ]);

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err(), "Missing base path should fail validation");
    }
}
