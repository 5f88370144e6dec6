//! novelepub - Plain-Text Novel to EPUB Conversion Library
//!
//! This crate converts plain-text web novels into EPUB 3 packages. Volume and
//! chapter headers (`第一卷 ...`, `第一章 ...`, `番外 ...`) are detected line by
//! line, the text is organized into a volume → chapter tree, and the tree is
//! packaged with a cover, a navigation document and one XHTML document per
//! volume and chapter.
//!
//! # Getting Started
//!
//! Describe the conversion with `NovelConfig` and its builder, then run it.
//!
//! ```rust,no_run
//! use novelepub::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> novelepub::error::Result<()> {
//!     let config = NovelConfig::builder()
//!         .source_path(PathBuf::from("./陈二狗的妖孽人生.txt"))
//!         .metadata(EbookMetadata::new("陈二狗的妖孽人生", "骁骑校"))
//!         .target_dir(PathBuf::from("./out"))
//!         .toc_style(TocStyle::Nested)
//!         .build()?;
//!
//!     config.preflight_check(ExecutionMode::FromSource)?;
//!
//!     let mut progress = |percent: u8| println!("{}%", percent);
//!     let report = config.convert(Some(&mut progress)).await?;
//!     println!(
//!         "Wrote {:?}: {} volumes, {} chapters",
//!         report.output_path, report.total_volumes, report.total_chapters
//!     );
//!     Ok(())
//! }
//! ```
//!
//! The two stages can also be used on their own: [`parser::parse`] builds a
//! [`Book`] from any sequence of lines and [`assembler::assemble`] turns a
//! `Book` into EPUB bytes in memory.

pub mod assembler;
pub mod book;
pub mod converter;
pub mod error;
pub mod generator;
pub mod parser;
pub mod path_utils;
pub mod progress;
pub mod types;

pub use converter::NovelConfig;
pub use converter::NovelConfigBuilder;

pub use assembler::{Assembler, assemble};
pub use book::{Book, Chapter, Volume};
pub use parser::{LineKind, classify, parse};
pub use types::{ConversionReport, EbookMetadata, ExecutionMode, TocStyle};

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types and traits, so that
/// `use novelepub::prelude::*;` is enough for typical conversions.
pub mod prelude {
    pub use super::{
        Assembler, Book, Chapter, ConversionReport, EbookMetadata, ExecutionMode, LineKind,
        NovelConfig, NovelConfigBuilder, TocStyle, Volume, assemble, classify, error, generator,
        parse, types,
    };
    pub use crate::generator::cover::{CoverGenerator, PlaceholderCover};
    pub use crate::parser::HeaderPatterns;
    pub use crate::progress::ProgressSink;
    pub use std::path::{Path, PathBuf};
    pub use std::sync::Arc;
}
