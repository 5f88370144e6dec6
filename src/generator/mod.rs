//! Package planning and EPUB generation.
//!
//! [`plan_package`] turns a [`Book`] into an ordered list of XHTML
//! [`Document`]s with stable identifiers plus the matching table of contents.
//! The plan is pure data; [`epub::EPub`] serializes it into the final package.

use crate::book::{Book, Chapter, Volume};
use crate::types::TocStyle;

pub mod cover;
pub mod epub;

/// Spine identifier of the navigation document that opens every package.
pub const NAV_DOCUMENT_ID: &str = "nav";

/// Directory inside the package that holds the generated documents.
pub const TEXT_DIR: &str = "text";

const DOCUMENT_TEMPLATE: &str = include_str!("../../templates/Document.xhtml");

/// What a generated document represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Volume,
    Chapter,
}

/// One XHTML document of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Sequence identifier, `001` for volumes or `001_001` for chapters.
    pub id: String,
    /// Path inside the package, e.g. `text/001_001.xhtml`.
    pub file_name: String,
    pub title: String,
    pub kind: DocumentKind,
    /// TOC nesting level, 1 for top-level entries.
    pub level: i32,
    pub xhtml: String,
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub href: String,
    pub children: Vec<TocEntry>,
}

/// All documents in reading order plus the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    pub documents: Vec<Document>,
    pub toc: Vec<TocEntry>,
}

impl PackagePlan {
    /// The linear reading order: the navigation document followed by every
    /// document id.
    pub fn spine(&self) -> Vec<&str> {
        std::iter::once(NAV_DOCUMENT_ID)
            .chain(self.documents.iter().map(|d| d.id.as_str()))
            .collect()
    }

    /// Identifiers of chapter documents in reading order.
    pub fn chapter_ids(&self) -> Vec<&str> {
        self.documents
            .iter()
            .filter(|d| d.kind == DocumentKind::Chapter)
            .map(|d| d.id.as_str())
            .collect()
    }

    pub fn chapter_document_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.kind == DocumentKind::Chapter)
            .count()
    }
}

/// Builds the document plan for `book`.
///
/// Volumes produce a document holding only their heading; chapters produce a
/// heading followed by one paragraph per content line. Documents appear in
/// pre-order: each volume, then its chapters.
pub fn plan_package(book: &Book, toc_style: TocStyle, lang: &str) -> PackagePlan {
    let mut documents = Vec::with_capacity(book.volumes.len() + book.chapter_count());
    let mut toc: Vec<TocEntry> = Vec::with_capacity(book.volumes.len());

    let chapter_level = match toc_style {
        TocStyle::Flat => 1,
        TocStyle::Nested => 2,
    };

    for (vol_idx, volume) in book.volumes.iter().enumerate() {
        let id = Volume::sequence_id(vol_idx);
        let file_name = document_path(&id);
        toc.push(TocEntry {
            title: volume.title.clone(),
            href: file_name.clone(),
            children: Vec::new(),
        });
        documents.push(Document {
            xhtml: render_volume(volume, lang),
            id,
            file_name,
            title: volume.title.clone(),
            kind: DocumentKind::Volume,
            level: 1,
        });

        for (chap_idx, chapter) in volume.chapters.iter().enumerate() {
            let id = Chapter::sequence_id(vol_idx, chap_idx);
            let file_name = document_path(&id);
            let entry = TocEntry {
                title: chapter.title.clone(),
                href: file_name.clone(),
                children: Vec::new(),
            };
            match toc_style {
                TocStyle::Flat => toc.push(entry),
                TocStyle::Nested => {
                    if let Some(parent) = toc.last_mut() {
                        parent.children.push(entry);
                    }
                }
            }
            documents.push(Document {
                xhtml: render_chapter(chapter, lang),
                id,
                file_name,
                title: chapter.title.clone(),
                kind: DocumentKind::Chapter,
                level: chapter_level,
            });
        }
    }

    PackagePlan { documents, toc }
}

fn document_path(id: &str) -> String {
    format!("{}/{}.xhtml", TEXT_DIR, id)
}

fn render_volume(volume: &Volume, lang: &str) -> String {
    let body = format!("<h1>{}</h1>", escape_xml(&volume.title));
    render_document(&volume.title, "volume", &body, lang)
}

fn render_chapter(chapter: &Chapter, lang: &str) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_xml(&chapter.title));
    for line in &chapter.content {
        body.push_str("<p>");
        body.push_str(&escape_xml(line));
        body.push_str("</p>\n");
    }
    render_document(&chapter.title, "chapter", body.trim_end(), lang)
}

fn render_document(title: &str, class: &str, body: &str, lang: &str) -> String {
    let (head, tail) = DOCUMENT_TEMPLATE
        .split_once("%body%")
        .unwrap_or((DOCUMENT_TEMPLATE, ""));
    let mut xhtml = head
        .replace("%lang%", &escape_xml(lang))
        .replace("%class%", class)
        .replace("%title%", &escape_xml(title));
    xhtml.push_str(body);
    xhtml.push_str(tail);
    xhtml
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn two_volume_book() -> Book {
        parse([
            "第一卷 起",
            "第一章 甲",
            "一行",
            "第二章 乙",
            "第二卷 承",
            "第三章 丙",
            "<危险> & \"引号\"",
        ])
    }

    #[test]
    fn test_plan_ids_and_spine_order() {
        let plan = plan_package(&two_volume_book(), TocStyle::Flat, "zh-CN");
        assert_eq!(
            plan.spine(),
            vec!["nav", "001", "001_001", "001_002", "002", "002_001"]
        );
        assert_eq!(plan.chapter_ids(), vec!["001_001", "001_002", "002_001"]);
        assert_eq!(plan.documents[2].file_name, "text/001_002.xhtml");
    }

    #[test]
    fn test_flat_toc() {
        let plan = plan_package(&two_volume_book(), TocStyle::Flat, "zh-CN");
        let titles: Vec<&str> = plan.toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["第一卷 起", "第一章 甲", "第二章 乙", "第二卷 承", "第三章 丙"]
        );
        assert!(plan.toc.iter().all(|e| e.children.is_empty()));
        assert!(plan.documents.iter().all(|d| d.level == 1));
    }

    #[test]
    fn test_nested_toc() {
        let plan = plan_package(&two_volume_book(), TocStyle::Nested, "zh-CN");
        assert_eq!(plan.toc.len(), 2);
        assert_eq!(plan.toc[0].href, "text/001.xhtml");
        let nested: Vec<&str> = plan.toc[0]
            .children
            .iter()
            .map(|e| e.href.as_str())
            .collect();
        assert_eq!(nested, vec!["text/001_001.xhtml", "text/001_002.xhtml"]);
        assert_eq!(plan.toc[1].children[0].title, "第三章 丙");
        assert_eq!(plan.documents[1].level, 2);
    }

    #[test]
    fn test_volume_document_has_only_heading() {
        let plan = plan_package(&two_volume_book(), TocStyle::Flat, "zh-CN");
        let volume = &plan.documents[0];
        assert_eq!(volume.kind, DocumentKind::Volume);
        assert!(volume.xhtml.contains("<h1>第一卷 起</h1>"));
        assert!(!volume.xhtml.contains("<p>"));
        assert!(volume.xhtml.contains("href=\"../stylesheet.css\""));
    }

    #[test]
    fn test_chapter_document_escapes_content() {
        let plan = plan_package(&two_volume_book(), TocStyle::Flat, "zh-CN");
        let chapter = plan.documents.last().unwrap();
        assert_eq!(chapter.title, "第三章 丙");
        assert!(chapter.xhtml.contains("<title>第三章 丙</title>"));
        assert!(
            chapter
                .xhtml
                .contains("<p>&lt;危险&gt; &amp; &quot;引号&quot;</p>")
        );
        assert!(chapter.xhtml.contains("lang=\"zh-CN\""));
    }

    #[test]
    fn test_chapter_paragraphs_keep_order() {
        let book = parse(["第一章 甲", "一", "二", "三"]);
        let plan = plan_package(&book, TocStyle::Flat, "zh-CN");
        let xhtml = &plan.documents[1].xhtml;
        let first = xhtml.find("<p>一</p>").unwrap();
        let second = xhtml.find("<p>二</p>").unwrap();
        let third = xhtml.find("<p>三</p>").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_empty_book_plans_nothing() {
        let plan = plan_package(&Book::new(), TocStyle::Flat, "zh-CN");
        assert!(plan.documents.is_empty());
        assert_eq!(plan.spine(), vec!["nav"]);
    }

    #[test]
    fn test_blank_input_plans_default_volume_only() {
        let plan = plan_package(&parse(["", "  "]), TocStyle::Flat, "zh-CN");
        assert_eq!(plan.spine(), vec!["nav", "001"]);
        assert_eq!(plan.documents[0].kind, DocumentKind::Volume);
        assert!(plan.chapter_ids().is_empty());
    }
}
