//! Common test utilities for the novelepub crate.
//!
//! Provides functions for setting up test directories, writing source text
//! files, creating dummy cover images and inspecting generated packages.

use image::{Rgb, RgbImage};
use novelepub::error::Result;
use rand::{Rng, distributions::Alphanumeric};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A small two-volume novel with a stray line before the first chapter.
#[allow(dead_code)]
pub const SAMPLE_NOVEL: &str = "\u{feff}陈二狗的妖孽人生

第一卷 山里
序言，不属于任何章节。
第一章 上山
　　张家寨的清晨。

　　二狗背着柴。
第二章 下山
　　城里很热闹。
第二卷 城里
第三章 进城
　　上海。
番外 富贵
　　哥哥的故事。
";

/// Per-test directories, unique for every call.
#[allow(dead_code)]
pub struct TestDirs {
    pub base_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
}

impl TestDirs {
    /// Removes this test's directory tree.
    #[allow(dead_code)]
    pub async fn cleanup(self) {
        let _ = fs::remove_dir_all(&self.base_dir).await;
    }
}

/// Creates a clean test directory with source and target subdirectories.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let unique_sub_path = format!("{}-{}", sub_path, rand_string);
    let base_dir = PathBuf::from(TEST_TMP_DIR).join(unique_sub_path);
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir).await.unwrap();
    }
    let source_dir = base_dir.join("source");
    let target_dir = base_dir.join("target");

    fs::create_dir_all(&source_dir).await.unwrap();
    fs::create_dir_all(&target_dir).await.unwrap();

    TestDirs {
        base_dir,
        source_dir,
        target_dir,
    }
}

/// Removes the entire test temporary directory.
#[allow(dead_code)]
pub async fn cleanup_all_test_dirs() {
    let test_dir = PathBuf::from(TEST_TMP_DIR);
    if test_dir.exists() {
        let _ = fs::remove_dir_all(&test_dir).await;
    }
}

/// Writes `content` as a UTF-8 text file and returns its path.
#[allow(dead_code)]
pub async fn write_text_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content.as_bytes()).await.unwrap();
    path
}

/// Creates a minimal single-color JPEG image at the given path.
#[allow(dead_code)]
pub async fn create_dummy_cover(path: &Path, color: Rgb<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let img = RgbImage::from_pixel(60, 80, color);
    let path_clone = path.to_path_buf();
    tokio::task::spawn_blocking(move || img.save_with_format(path_clone, image::ImageFormat::Jpeg))
        .await
        .map_err(|e| novelepub::error::Error::Other(e.to_string()))??;
    Ok(())
}

fn open_archive(path: &Path) -> zip::ZipArchive<std::fs::File> {
    assert!(path.is_file(), "Output file does not exist: {:?}", path);
    let file = std::fs::File::open(path).unwrap();
    zip::ZipArchive::new(file).unwrap()
}

/// Lists every entry name of a ZIP file.
#[allow(dead_code)]
pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let archive = open_archive(path);
    archive.file_names().map(str::to_string).collect()
}

/// Reads the first entry whose name ends with `suffix`.
#[allow(dead_code)]
pub fn read_zip_entry(path: &Path, suffix: &str) -> String {
    let mut archive = open_archive(path);
    let name = archive
        .file_names()
        .find(|name| name.ends_with(suffix))
        .map(str::to_string)
        .unwrap_or_else(|| panic!("No entry ending with '{}' in {:?}", suffix, path));
    let mut entry = archive.by_name(&name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

/// Byte offset of `needle` in `haystack`, failing the test when absent.
#[allow(dead_code)]
pub fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found", needle))
}
