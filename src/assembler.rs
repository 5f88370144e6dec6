//! Turns a parsed [`Book`] into a finished EPUB package.
//!
//! The assembler never mutates the book. All documents are built in memory,
//! so a conversion leaves no scratch files behind.
//!
//! Progress checkpoints:
//!
//! | percent | reached when |
//! |---|---|
//! | 10 | the parsed book is received |
//! | 40 | every volume and chapter document is generated |
//! | 50 | the cover is attached |
//! | 50..100 | each chapter document is added (`50 + done / total * 50`) |
//! | 100 | the package is serialized |

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use log::{info, warn};

use crate::book::Book;
use crate::error::Result;
use crate::generator::cover::{CoverGenerator, PlaceholderCover, image_file_info};
use crate::generator::epub::EPub;
use crate::generator::{DocumentKind, PackagePlan, plan_package};
use crate::progress::{Progress, ProgressSink};
use crate::types::{EbookMetadata, TocStyle};

/// A serialized package together with the plan it was built from.
#[derive(Debug, Clone)]
pub struct AssembledPackage {
    pub bytes: Vec<u8>,
    pub plan: PackagePlan,
    /// Whether the cover came from the cover generator.
    pub cover_generated: bool,
}

/// Configurable package assembler.
#[derive(Clone)]
pub struct Assembler {
    cover_generator: Arc<dyn CoverGenerator + Send + Sync>,
    toc_style: TocStyle,
}

impl fmt::Debug for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembler")
            .field("cover_generator", &"Some(CoverGenerator)")
            .field("toc_style", &self.toc_style)
            .finish()
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            cover_generator: Arc::new(PlaceholderCover::default()),
            toc_style: TocStyle::default(),
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the generator used when no usable cover is supplied.
    pub fn with_cover_generator(
        mut self,
        cover_generator: Arc<dyn CoverGenerator + Send + Sync>,
    ) -> Self {
        self.cover_generator = cover_generator;
        self
    }

    pub fn with_toc_style(mut self, toc_style: TocStyle) -> Self {
        self.toc_style = toc_style;
        self
    }

    /// Assembles `book` into EPUB bytes.
    ///
    /// # Arguments
    ///
    /// * `book` - The parsed volume and chapter tree; it is only read
    /// * `metadata` - Title, author, language and optional cover bytes
    /// * `progress` - Optional sink receiving strictly increasing percentages
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The complete EPUB package
    /// * `Err(Error)` - Cover generation or packaging failed
    pub fn assemble(
        &self,
        book: &Book,
        metadata: &EbookMetadata,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Vec<u8>> {
        Ok(self.build(book, metadata, progress)?.bytes)
    }

    /// Assembles `book` and also returns the document plan.
    ///
    /// Progress is reported at the checkpoints listed in the module docs.
    ///
    /// # Returns
    ///
    /// * `Ok(AssembledPackage)` - Contains:
    ///   - `bytes`: the serialized package
    ///   - `plan`: documents, spine order and table of contents
    ///   - `cover_generated`: whether the cover generator was used
    /// * `Err(Error)` - Cover generation or packaging failed
    pub fn build(
        &self,
        book: &Book,
        metadata: &EbookMetadata,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<AssembledPackage> {
        let mut progress = Progress::new(progress);
        progress.report(10);

        let plan = plan_package(book, self.toc_style, &metadata.language);
        progress.report(40);

        let mut epub = EPub::new()?;
        epub.set_metadata(metadata)?;

        let (cover, cover_generated) = self.resolve_cover(metadata)?;
        epub.set_cover(&cover)?;
        progress.report(50);

        let total_chapters = plan.chapter_document_count();
        let mut processed = 0;
        for document in &plan.documents {
            epub.add_document(document)?;
            if document.kind == DocumentKind::Chapter {
                processed += 1;
                progress.report_fraction(50, 100, processed, total_chapters);
            }
        }
        if total_chapters == 0 {
            progress.report_fraction(50, 100, 0, 0);
        }

        let bytes = epub.generate()?;
        progress.report(100);

        info!(
            "Assembled '{}': {} document(s), {} chapter(s), {} bytes",
            metadata.title,
            plan.documents.len(),
            total_chapters,
            bytes.len()
        );

        Ok(AssembledPackage {
            bytes,
            plan,
            cover_generated,
        })
    }

    /// Picks the supplied cover when it is a recognized image, otherwise asks
    /// the cover generator.
    fn resolve_cover<'m>(&self, metadata: &'m EbookMetadata) -> Result<(Cow<'m, [u8]>, bool)> {
        match metadata.cover_image.as_deref() {
            Some(bytes) => match image_file_info(bytes) {
                Ok(_) => Ok((Cow::Borrowed(bytes), false)),
                Err(e) => {
                    warn!("Supplied cover is unusable ({}), generating a placeholder", e);
                    let generated = self.cover_generator.generate(&metadata.title)?;
                    Ok((Cow::Owned(generated), true))
                }
            },
            None => {
                let generated = self.cover_generator.generate(&metadata.title)?;
                Ok((Cow::Owned(generated), true))
            }
        }
    }
}

/// Assembles `book` with the default assembler: placeholder covers and a flat
/// table of contents.
pub fn assemble(
    book: &Book,
    metadata: &EbookMetadata,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<Vec<u8>> {
    Assembler::default().assemble(book, metadata, progress)
}
