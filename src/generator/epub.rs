use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use log::debug;

use crate::error::Result;
use crate::generator::cover::image_file_info;
use crate::generator::{Document, DocumentKind};
use crate::types::EbookMetadata;

const STYLESHEET: &str = include_str!("../../templates/Novel.css");

/// Name recorded as the package generator.
pub const GENERATOR_NAME: &str = concat!("novelepub ", env!("CARGO_PKG_VERSION"));

/// An in-memory EPUB 3 package under construction.
///
/// This wraps `EpubBuilder`: the shared stylesheet and the inline navigation
/// document are set up on creation, and documents are appended in spine order.
pub struct EPub {
    epub: EpubBuilder<ZipLibrary>,
    start_marked: bool,
}

impl EPub {
    /// Creates an empty package with the shared stylesheet and a navigation
    /// document as the first spine entry.
    pub fn new() -> Result<Self> {
        let mut epub = EpubBuilder::new(ZipLibrary::new()?)?;
        epub.epub_version(EpubVersion::V30);
        epub.stylesheet(STYLESHEET.as_bytes())?;
        epub.inline_toc();

        Ok(EPub {
            epub,
            start_marked: false,
        })
    }

    /// Embeds title, author, language and generator.
    pub fn set_metadata(&mut self, metadata: &EbookMetadata) -> Result<&mut Self> {
        self.epub.metadata("title", &metadata.title)?;
        if !metadata.author.is_empty() {
            self.epub.metadata("author", &metadata.author)?;
        }
        self.epub.set_lang(&metadata.language);
        self.epub.metadata("generator", GENERATOR_NAME)?;
        Ok(self)
    }

    /// Attaches `bytes` verbatim as the cover image.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Encoded image data; the format is sniffed from its header
    ///
    /// # Returns
    ///
    /// * `Ok(&mut Self)` - The cover was stored as `images/cover.{ext}`
    /// * `Err(Error::Unsupported)` - The bytes are not a recognized image format
    pub fn set_cover(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        let (extension, mime) = image_file_info(bytes)?;
        let internal_cover_path = format!("images/cover.{}", extension);
        self.epub
            .add_cover_image(internal_cover_path, bytes, mime)?;
        Ok(self)
    }

    /// Appends a document to the manifest, spine and table of contents.
    ///
    /// The first chapter is marked as the reading start.
    ///
    /// # Arguments
    ///
    /// * `document` - A planned volume or chapter document; its `level`
    ///   decides the nesting in the table of contents
    pub fn add_document(&mut self, document: &Document) -> Result<&mut Self> {
        let mut content = EpubContent::new(document.file_name.as_str(), document.xhtml.as_bytes())
            .title(document.title.as_str())
            .level(document.level);
        if document.kind == DocumentKind::Chapter && !self.start_marked {
            content = content.reftype(ReferenceType::Text);
            self.start_marked = true;
        }
        self.epub.add_content(content)?;
        debug!("Added {} ({})", document.file_name, document.title);
        Ok(self)
    }

    /// Serializes the package.
    pub fn generate(mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.epub.generate(&mut bytes)?;
        Ok(bytes)
    }
}
