//! Structural parsing of plain-text novels.
//!
//! Every line is classified on its own by [`classify`], and the resulting
//! [`LineKind`]s are folded into a [`ParseState`] that carries the open
//! volume/chapter cursor. The fold produces a [`Book`] in a single forward pass
//! with no lookahead.

use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::book::{Book, Chapter, DEFAULT_VOLUME_TITLE, Volume};
use crate::error::{Error, Result};

lazy_static! {
    /// Volume headers: `第三卷 ...` or `卷三 ...` (spelled-out numerals or digits).
    pub static ref DEFAULT_VOLUME_REGEX: Regex =
        Regex::new(r"^(?:第[零一二三四五六七八九十百千0-9]+卷|卷[零一二三四五六七八九十百千0-9]+)")
            .unwrap();
    /// Chapter headers: `第十二章 标题`, `第十二章：标题`, a bare `第十二章`, or `番外 标题`.
    pub static ref DEFAULT_CHAPTER_REGEX: Regex =
        Regex::new(r"^第[零一二三四五六七八九十百千0-9]+章(?:[ ：]|$)|^番外 ").unwrap();
}

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank after trimming; no state change.
    Skip,
    Volume(String),
    Chapter(String),
    Content(String),
}

/// The pair of header patterns used by [`classify`].
#[derive(Debug, Clone)]
pub struct HeaderPatterns {
    pub volume: Regex,
    pub chapter: Regex,
}

impl Default for HeaderPatterns {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME_REGEX.clone(),
            chapter: DEFAULT_CHAPTER_REGEX.clone(),
        }
    }
}

impl HeaderPatterns {
    /// Compiles header patterns, falling back to the defaults for any pattern
    /// that is not given.
    pub fn new(volume: Option<&str>, chapter: Option<&str>) -> Result<Self> {
        Ok(Self {
            volume: match volume {
                Some(pattern) => Regex::new(pattern)?,
                None => DEFAULT_VOLUME_REGEX.clone(),
            },
            chapter: match chapter {
                Some(pattern) => Regex::new(pattern)?,
                None => DEFAULT_CHAPTER_REGEX.clone(),
            },
        })
    }
}

/// Classifies one line of input.
///
/// The volume pattern is tested before the chapter pattern, so a line matching
/// both is a volume header.
pub fn classify(line: &str, patterns: &HeaderPatterns) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Skip
    } else if patterns.volume.is_match(trimmed) {
        LineKind::Volume(trimmed.to_string())
    } else if patterns.chapter.is_match(trimmed) {
        LineKind::Chapter(trimmed.to_string())
    } else {
        LineKind::Content(trimmed.to_string())
    }
}

/// Position of the most recently opened volume and chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub volume: Option<usize>,
    pub chapter: Option<usize>,
}

/// Fold accumulator: the tree built so far plus the open cursor.
#[derive(Debug, Default)]
pub struct ParseState {
    book: Book,
    cursor: Cursor,
    content_lines: usize,
    dropped_lines: usize,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Number of content lines discarded because no chapter was open.
    pub fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }

    /// Applies one classified line and returns the next state.
    pub fn step(mut self, kind: LineKind) -> Self {
        match kind {
            LineKind::Skip => {}
            LineKind::Volume(title) => {
                self.book.volumes.push(Volume::new(title));
                self.cursor = Cursor {
                    volume: Some(self.book.volumes.len() - 1),
                    chapter: None,
                };
            }
            LineKind::Chapter(title) => {
                let vol_idx = self.open_volume();
                let volume = &mut self.book.volumes[vol_idx];
                volume.chapters.push(Chapter::new(title));
                self.cursor.chapter = Some(volume.chapters.len() - 1);
            }
            LineKind::Content(text) => {
                let target = match self.cursor {
                    Cursor {
                        volume: Some(v),
                        chapter: Some(c),
                    } => self
                        .book
                        .volumes
                        .get_mut(v)
                        .and_then(|volume| volume.chapters.get_mut(c)),
                    _ => None,
                };
                match target {
                    Some(chapter) => {
                        chapter.content.push(text);
                        self.content_lines += 1;
                    }
                    None => self.dropped_lines += 1,
                }
            }
        }
        self
    }

    /// Finishes the fold.
    ///
    /// Input without any volume gets a single default volume, so every parsed
    /// book has at least one volume.
    pub fn finish(mut self) -> Book {
        if self.book.volumes.is_empty() {
            self.book.volumes.push(Volume::new(DEFAULT_VOLUME_TITLE));
        }
        debug!(
            "Parsed {} volume(s), {} chapter(s), {} content line(s); dropped {} line(s) outside any chapter",
            self.book.volumes.len(),
            self.book.chapter_count(),
            self.content_lines,
            self.dropped_lines
        );
        self.book
    }

    /// Index of the open volume, synthesizing the default volume if none is open.
    fn open_volume(&mut self) -> usize {
        match self.cursor.volume {
            Some(idx) => idx,
            None => {
                self.book.volumes.push(Volume::new(DEFAULT_VOLUME_TITLE));
                let idx = self.book.volumes.len() - 1;
                self.cursor = Cursor {
                    volume: Some(idx),
                    chapter: None,
                };
                idx
            }
        }
    }
}

/// Parses lines with the default header patterns.
pub fn parse<I, S>(lines: I) -> Book
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with(lines, &HeaderPatterns::default())
}

/// Parses lines with the given header patterns.
pub fn parse_with<I, S>(lines: I, patterns: &HeaderPatterns) -> Book
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .fold(ParseState::new(), |state, line| {
            state.step(classify(line.as_ref(), patterns))
        })
        .finish()
}

/// Reads a UTF-8 text file and parses it into a [`Book`].
///
/// A leading byte-order mark is ignored.
///
/// # Arguments
///
/// * `path` - The text file to read
/// * `patterns` - Volume and chapter header patterns used by [`classify`]
///
/// # Returns
///
/// * `Ok(Book)` - The parsed tree, always holding at least one volume
/// * `Err(Error::Io)` - The file is missing or unreadable, or is not valid
///   UTF-8 (`ErrorKind::InvalidData`); no partial book is returned
pub async fn read_book(path: &Path, patterns: &HeaderPatterns) -> Result<Book> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read text file '{}': {}", path.display(), e),
        ))
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("'{}' is not valid UTF-8: {}", path.display(), e),
        ))
    })?;

    let book = parse_with(text.trim_start_matches('\u{feff}').lines(), patterns);
    info!(
        "Read '{}': {} volume(s), {} chapter(s)",
        path.display(),
        book.volumes.len(),
        book.chapter_count()
    );
    Ok(book)
}
