//! Core data types and reports for the novelepub conversion library.
//!
//! - Book metadata (`EbookMetadata`)
//! - Table of contents layout (`TocStyle`)
//! - Conversion outcome (`ConversionReport`)
//! - Execution modes for preflight validation (`ExecutionMode`)

use std::path::PathBuf;

/// Language tag used when none is given.
pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Metadata embedded at the package level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EbookMetadata {
    pub title: String,
    pub author: String,
    pub language: String, // e.g., "zh-CN"
    /// Cover image bytes, used verbatim. `None` means a placeholder is generated.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cover_image: Option<Vec<u8>>,
}

impl Default for EbookMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            cover_image: None,
        }
    }
}

impl EbookMetadata {
    /// Creates metadata with a title and author and the default language.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    pub fn with_cover(mut self, cover_image: Vec<u8>) -> Self {
        self.cover_image = Some(cover_image);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Shape of the table of contents.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TocStyle {
    /// Volumes and chapters all at the top level, each chapter after its volume.
    #[default]
    Flat,
    /// Chapters nested under their volume.
    Nested,
}

/// Specifies the intended starting point for a conversion.
/// Used by `NovelConfig::preflight_check` to tailor validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecutionMode {
    /// The conversion reads and parses the configured `source_path`.
    FromSource,
    /// The conversion starts from an already parsed `Book`.
    FromBook,
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub total_volumes: usize,
    pub total_chapters: usize,
    pub chapter_counts_per_volume: Vec<usize>, // e.g., `[10, 12, 8]` for 3 volumes
    /// Whether the placeholder cover was used.
    pub cover_generated: bool,
    pub bytes_written: usize,
}
