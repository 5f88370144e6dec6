//! Path utilities for input validation and output file naming.
//!
//! Book titles become output file names, so they are sanitized for the
//! characters that file systems reject.

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Extension of generated packages.
pub const EPUB_EXTENSION: &str = "epub";

/// Converts a path to a string with fallback to lossy conversion.
pub fn path_to_string_lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Gets the file stem of a path with fallback to lossy conversion.
///
/// # Returns
///
/// * `Option<String>` - The stem (`"书名"` for `"dir/书名.txt"`), or `None` if
///   the path has no file name
pub fn file_stem_lossy(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
}

/// Checks a path for characters that break file systems or archives.
///
/// # Returns
///
/// * `Result<()>` - Ok if the path is valid, or an error describing the issue
pub fn validate_path(path: &Path) -> Result<()> {
    let path_str = path_to_string_lossy(path);

    if path_str
        .chars()
        .any(|c| matches!(c, '<' | '>' | '"' | '|' | '?' | '*'))
    {
        return Err(Error::InvalidPath(
            path.to_path_buf(),
            "Path contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// Sanitizes a filename by replacing invalid characters with safe alternatives.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | '"' | '|' | '?' | '*' => '-',
            ':' => '-',
            '/' | '\\' => '-',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Default output location for a title: `{target_dir}/{sanitized title}.epub`.
pub fn default_output_path(target_dir: &Path, title: &str) -> PathBuf {
    target_dir.join(format!("{}.{}", sanitize_filename(title), EPUB_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_path_to_string_lossy() {
        let path = Path::new("test/path");
        let result = path_to_string_lossy(path);
        assert!(result.contains("test"));
        assert!(result.contains("path"));
    }

    #[test]
    fn test_file_stem_lossy() {
        assert_eq!(
            file_stem_lossy(Path::new("novels/陈二狗的妖孽人生.txt")),
            Some("陈二狗的妖孽人生".to_string())
        );
        assert_eq!(file_stem_lossy(Path::new("")), None);
    }

    #[test]
    fn test_validate_path_with_invalid_chars() {
        assert!(validate_path(Path::new("test<invalid>path")).is_err());
        assert!(validate_path(Path::new("novels/第一部.txt")).is_ok());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test<file>"), "test-file-");
        assert_eq!(sanitize_filename("test|file"), "test-file");
        assert_eq!(sanitize_filename("test?file"), "test-file");
        assert_eq!(sanitize_filename("test:file"), "test-file");
        assert_eq!(sanitize_filename("test/file"), "test-file");
        assert_eq!(sanitize_filename("书名：副标题"), "书名：副标题");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("out"), "上/下"),
            Path::new("out").join("上-下.epub")
        );
    }
}
