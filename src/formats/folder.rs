//! Loose-image directory handler.

use crate::error::{AppError, Result};
use crate::formats::FormatHandler;
use crate::library::item::{Page, PageSet};
use std::path::Path;

/// Handler for directories of images.
///
/// Every regular file becomes a page; nothing is read until served.
pub struct FolderHandler;

impl FormatHandler for FolderHandler {
    fn load_pages(&self, path: &Path) -> Result<PageSet> {
        let entries = std::fs::read_dir(path).map_err(|e| AppError::from_io(path, e))?;

        let mut pages = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_path = entry.path();

            // Follows symlinks, like the root scan
            if !file_path.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::warn!(path = %file_path.display(), "Skipping non UTF-8 file name");
                continue;
            };

            pages.push(Page::file(name, file_path));
        }

        tracing::debug!(path = %path.display(), pages = pages.len(), "Loaded folder pages");
        Ok(PageSet::new(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::item::PageContent;

    #[test]
    fn test_all_regular_files_are_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("01.png"), b"png").unwrap();
        std::fs::write(dir.path().join("02.JPG"), b"jpg").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"txt").unwrap();
        std::fs::create_dir(dir.path().join("extras")).unwrap();

        let pages = FolderHandler.load_pages(dir.path()).unwrap();

        let names: Vec<&str> = pages.names().collect();
        assert_eq!(names, ["01.png", "02.JPG", "notes.txt"]);
        assert!(!pages.contains("extras"));
        assert_eq!(
            pages.get("01.png").unwrap().content,
            PageContent::File(dir.path().join("01.png"))
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = FolderHandler.load_pages(&missing).unwrap_err();
        assert!(matches!(err, AppError::NotFound(p) if p == missing));
    }
}
