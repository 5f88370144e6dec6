use log::{info, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembler::Assembler;
use crate::book::Book;
use crate::error::{Error, Result};
use crate::generator::cover::CoverGenerator;
use crate::parser::{HeaderPatterns, read_book};
use crate::path_utils::{default_output_path, file_stem_lossy, path_to_string_lossy, validate_path};
use crate::progress::ProgressSink;
use crate::types::{ConversionReport, DEFAULT_LANGUAGE, EbookMetadata, ExecutionMode, TocStyle};

/// The main conversion configuration, built declaratively using the builder pattern.
///
/// This struct holds everything needed to turn a text file into an EPUB:
/// the source path, book metadata, an optional cover, where to write the
/// result and how to recognize headers. Once configured, it can run:
///
/// - [`convert`](NovelConfig::convert): read, parse and package the source file
/// - [`convert_book`](NovelConfig::convert_book): package an already parsed [`Book`]
/// - [`parse_source`](NovelConfig::parse_source): parsing only, no packaging
///
/// ## Builder Pattern
///
/// ```rust,no_run
/// # use novelepub::prelude::*;
/// let config = NovelConfig::builder()
///     .source_path(PathBuf::from("./陈二狗的妖孽人生.txt"))
///     .metadata(EbookMetadata::new("陈二狗的妖孽人生", "骁骑校"))
///     .target_dir(PathBuf::from("./out"))
///     .build()
///     .expect("Invalid configuration");
/// ```
#[derive(Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
pub struct NovelConfig {
    /// Path of the UTF-8 text file to convert.
    ///
    /// Required for [`convert`](NovelConfig::convert) and
    /// [`parse_source`](NovelConfig::parse_source).
    #[builder(default)]
    pub source_path: PathBuf,

    /// Title, author and language of the book.
    ///
    /// An empty title is replaced by the source file stem. Cover bytes set
    /// here take precedence over [`cover_path`](NovelConfig::cover_path).
    #[builder(default)]
    pub metadata: EbookMetadata,

    /// Cover image file. If absent, unreadable or not an image, a placeholder
    /// cover is generated from the title.
    #[builder(default)]
    pub cover_path: Option<PathBuf>,

    /// Exact output file. When unset the package is written to
    /// `target_dir/{title}.epub`.
    #[builder(default)]
    pub output_path: Option<PathBuf>,

    /// Directory for the default output file name. It must already exist.
    #[builder(default = "PathBuf::from(\".\")")]
    pub target_dir: PathBuf,

    /// Shape of the table of contents.
    #[builder(default)]
    pub toc_style: TocStyle,

    /// Custom regex for volume header lines, replacing the default
    /// `第N卷` / `卷N` pattern.
    #[builder(default)]
    pub volume_pattern: Option<String>,

    /// Custom regex for chapter header lines, replacing the default
    /// `第N章 ...` / `番外 ...` pattern.
    #[builder(default)]
    pub chapter_pattern: Option<String>,

    /// Custom placeholder-cover renderer. Defaults to
    /// [`PlaceholderCover`](crate::generator::cover::PlaceholderCover).
    #[builder(default, setter(custom))]
    pub cover_generator: Option<Arc<dyn CoverGenerator + Send + Sync>>,
}

impl std::fmt::Debug for NovelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NovelConfig")
            .field("source_path", &self.source_path)
            .field("metadata.title", &self.metadata.title)
            .field("metadata.author", &self.metadata.author)
            .field("metadata.language", &self.metadata.language)
            .field("cover_path", &self.cover_path)
            .field("output_path", &self.output_path)
            .field("target_dir", &self.target_dir)
            .field("toc_style", &self.toc_style)
            .field("volume_pattern", &self.volume_pattern)
            .field("chapter_pattern", &self.chapter_pattern)
            .field(
                "cover_generator",
                if self.cover_generator.is_some() {
                    &"Some(CoverGenerator)"
                } else {
                    &"None"
                },
            )
            .finish()
    }
}

impl NovelConfig {
    /// Creates a new builder for configuring `NovelConfig`.
    pub fn builder() -> NovelConfigBuilder {
        NovelConfigBuilder::default()
    }

    /// Metadata as it will be embedded: the title falls back to the source
    /// file stem and the language to [`DEFAULT_LANGUAGE`].
    pub fn effective_metadata(&self) -> EbookMetadata {
        let mut metadata = self.metadata.clone();
        if metadata.title.trim().is_empty() {
            if let Some(stem) = file_stem_lossy(&self.source_path) {
                metadata.title = stem;
            }
        }
        if metadata.language.trim().is_empty() {
            metadata.language = DEFAULT_LANGUAGE.to_string();
        }
        metadata
    }

    /// The file the package will be written to.
    pub fn output_file_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => default_output_path(&self.target_dir, &self.effective_metadata().title),
        }
    }

    /// Compiles the configured header patterns.
    pub fn header_patterns(&self) -> Result<HeaderPatterns> {
        HeaderPatterns::new(
            self.volume_pattern.as_deref(),
            self.chapter_pattern.as_deref(),
        )
    }

    /// Performs validation checks on the configuration for a specific execution mode.
    ///
    /// Nothing is read or written. All `convert*` methods call this
    /// automatically.
    ///
    /// * [`ExecutionMode::FromSource`]: the source file must exist and be a file
    /// * [`ExecutionMode::FromBook`]: only title and output path are checked
    pub fn preflight_check(&self, mode: ExecutionMode) -> Result<&Self> {
        if self.effective_metadata().title.trim().is_empty() {
            return Err(Error::Other("Ebook title is required".to_string()));
        }
        validate_path(&self.output_file_path())?;

        match mode {
            ExecutionMode::FromSource => self.validate_source()?,
            ExecutionMode::FromBook => {}
        }

        Ok(self)
    }

    fn validate_source(&self) -> Result<()> {
        if self.source_path.as_os_str().is_empty() {
            return Err(Error::Other(
                "`source_path` must be set for `FromSource` execution mode.".to_string(),
            ));
        }
        validate_path(&self.source_path)?;
        if !self.source_path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source path does not exist: {:?}", self.source_path),
            )));
        }
        if !self.source_path.is_file() {
            return Err(Error::InvalidPath(
                self.source_path.clone(),
                "Source path is not a file.".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads and parses the source file without packaging it.
    pub async fn parse_source(&self) -> Result<Book> {
        self.validate_source()?;
        read_book(&self.source_path, &self.header_patterns()?).await
    }

    /// Runs the full pipeline: read and parse the source file, resolve the
    /// cover, assemble the package and write it to
    /// [`output_file_path`](NovelConfig::output_file_path).
    ///
    /// # Arguments
    ///
    /// * `progress` - Optional sink receiving percentages from 10 to 100
    ///
    /// # Returns
    ///
    /// * `Ok(ConversionReport)` - Output path, volume and chapter counts, and
    ///   whether a placeholder cover was generated
    /// * `Err(Error::Io)` - The source is missing, unreadable or not UTF-8, or
    ///   the output could not be written
    /// * `Err(Error)` - Other validation or packaging errors
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use novelepub::prelude::*;
    /// # #[tokio::main]
    /// # async fn main() -> novelepub::error::Result<()> {
    /// let config = NovelConfig::builder()
    ///     .source_path(PathBuf::from("./book.txt"))
    ///     .metadata(EbookMetadata::new("书名", "作者"))
    ///     .cover_path(PathBuf::from("./cover.jpg"))
    ///     .build()?;
    ///
    /// let mut progress = |percent: u8| println!("{}%", percent);
    /// let report = config.convert(Some(&mut progress)).await?;
    /// println!("Wrote {:?}", report.output_path);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn convert(
        &self,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<ConversionReport> {
        self.preflight_check(ExecutionMode::FromSource)?;
        let book = read_book(&self.source_path, &self.header_patterns()?).await?;
        self.convert_book(&book, progress).await
    }

    /// Packages an already parsed book and writes it to
    /// [`output_file_path`](NovelConfig::output_file_path).
    ///
    /// The output directory must exist; an unwritable destination fails with
    /// [`Error::Io`].
    ///
    /// # Arguments
    ///
    /// * `book` - A parsed book, e.g. from [`parse_source`](NovelConfig::parse_source)
    /// * `progress` - Optional sink receiving percentages from 10 to 100
    ///
    /// # Returns
    ///
    /// * `Ok(ConversionReport)` - Summary of the written package
    /// * `Err(Error)` - Validation, packaging or write errors
    pub async fn convert_book(
        &self,
        book: &Book,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<ConversionReport> {
        self.preflight_check(ExecutionMode::FromBook)?;

        let mut metadata = self.effective_metadata();
        if metadata.cover_image.is_none() {
            if let Some(cover_path) = &self.cover_path {
                metadata.cover_image = read_cover(cover_path).await;
            }
        }

        let output_path = self.output_file_path();
        let package = self.assembler().build(book, &metadata, progress)?;

        tokio::fs::write(&output_path, &package.bytes)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to write EPUB file '{}': {}",
                        path_to_string_lossy(&output_path),
                        e
                    ),
                ))
            })?;
        info!(
            "Wrote '{}' ({} bytes)",
            path_to_string_lossy(&output_path),
            package.bytes.len()
        );

        Ok(ConversionReport {
            output_path,
            total_volumes: book.volumes.len(),
            total_chapters: book.chapter_count(),
            chapter_counts_per_volume: book.chapter_counts_per_volume(),
            cover_generated: package.cover_generated,
            bytes_written: package.bytes.len(),
        })
    }

    fn assembler(&self) -> Assembler {
        let assembler = Assembler::new().with_toc_style(self.toc_style);
        match &self.cover_generator {
            Some(generator) => assembler.with_cover_generator(Arc::clone(generator)),
            None => assembler,
        }
    }
}

/// Reads a cover file; failures are logged and yield `None` so that the
/// placeholder is used instead.
async fn read_cover(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(
                "Cannot read cover image '{}' ({}), generating a placeholder",
                path_to_string_lossy(path),
                e
            );
            None
        }
    }
}

impl NovelConfigBuilder {
    /// Sets a custom placeholder-cover renderer.
    pub fn cover_generator<G>(&mut self, generator: G) -> &mut Self
    where
        G: CoverGenerator + Send + Sync + 'static,
    {
        self.cover_generator = Some(Some(Arc::new(generator)));
        self
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(Some(s)) = &self.volume_pattern {
            if Regex::new(s).is_err() {
                return Err(format!("Invalid volume_pattern: {}", s));
            }
        }
        if let Some(Some(s)) = &self.chapter_pattern {
            if Regex::new(s).is_err() {
                return Err(format!("Invalid chapter_pattern: {}", s));
            }
        }
        Ok(())
    }
}
