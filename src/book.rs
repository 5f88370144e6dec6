//! The in-memory book tree produced by the parser.
//!
//! A [`Book`] owns its [`Volume`]s in reading order, and every volume owns its
//! [`Chapter`]s. The tree is built in one pass by [`crate::parser`] and is only
//! read afterwards.

/// Title given to the volume synthesized when chapters appear before any
/// volume header.
pub const DEFAULT_VOLUME_TITLE: &str = "默认卷";

/// Root of the parsed structure: volumes in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub volumes: Vec<Volume>,
}

/// A titled group of chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

/// A titled unit of narrative text, one entry per non-empty source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub content: Vec<String>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no volume exists.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Total number of chapters across all volumes.
    pub fn chapter_count(&self) -> usize {
        self.volumes.iter().map(|v| v.chapters.len()).sum()
    }

    /// Number of chapters in each volume, in reading order.
    pub fn chapter_counts_per_volume(&self) -> Vec<usize> {
        self.volumes.iter().map(|v| v.chapters.len()).collect()
    }

    /// Iterates over every chapter in reading order together with its
    /// 0-based volume and chapter indices.
    pub fn chapters(&self) -> impl Iterator<Item = (usize, usize, &Chapter)> {
        self.volumes.iter().enumerate().flat_map(|(vol_idx, volume)| {
            volume
                .chapters
                .iter()
                .enumerate()
                .map(move |(chap_idx, chapter)| (vol_idx, chap_idx, chapter))
        })
    }
}

impl Volume {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapters: Vec::new(),
        }
    }

    /// Sequence identifier of the volume at `vol_idx` (0-based), e.g. `"001"`.
    pub fn sequence_id(vol_idx: usize) -> String {
        format!("{:03}", vol_idx + 1)
    }
}

impl Chapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Compound identifier `{volume:03}_{chapter:03}` for the chapter at
    /// `chap_idx` within the volume at `vol_idx` (both 0-based).
    ///
    /// Chapter numbering restarts at 1 in every volume, so identifiers sort
    /// lexically in reading order for up to 999 volumes of 999 chapters.
    pub fn sequence_id(vol_idx: usize, chap_idx: usize) -> String {
        format!("{:03}_{:03}", vol_idx + 1, chap_idx + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        let mut first = Volume::new("第一卷 起");
        first.chapters.push(Chapter::new("第一章 甲"));
        first.chapters.push(Chapter::new("第二章 乙"));
        let mut second = Volume::new("第二卷 承");
        second.chapters.push(Chapter::new("第三章 丙"));
        Book {
            volumes: vec![first, second],
        }
    }

    #[test]
    fn test_sequence_ids_are_zero_padded() {
        assert_eq!(Volume::sequence_id(0), "001");
        assert_eq!(Volume::sequence_id(41), "042");
        assert_eq!(Chapter::sequence_id(0, 0), "001_001");
        assert_eq!(Chapter::sequence_id(2, 998), "003_999");
    }

    #[test]
    fn test_chapter_ids_sort_in_reading_order() {
        let mut ids = Vec::new();
        for vol in [0, 1, 9, 99, 998] {
            for chap in [0, 1, 8, 9, 10, 99, 100, 998] {
                ids.push(Chapter::sequence_id(vol, chap));
            }
        }
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "identifiers must be unique");
    }

    #[test]
    fn test_chapter_iteration_and_counts() {
        let book = sample_book();
        assert_eq!(book.chapter_count(), 3);
        assert_eq!(book.chapter_counts_per_volume(), vec![2, 1]);

        let visited: Vec<(usize, usize, &str)> = book
            .chapters()
            .map(|(v, c, ch)| (v, c, ch.title.as_str()))
            .collect();
        assert_eq!(
            visited,
            vec![(0, 0, "第一章 甲"), (0, 1, "第二章 乙"), (1, 0, "第三章 丙")]
        );
    }
}
