//! CBZ (Comic Book ZIP) format handler.

use crate::error::{AppError, Result};
use crate::formats::FormatHandler;
use crate::library::item::{Page, PageSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Handler for CBZ files.
///
/// Image entries are decompressed eagerly so later requests never reopen the archive.
pub struct CbzHandler;

impl CbzHandler {
    /// Check if an archive entry name is a servable image.
    fn is_image_file(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
    }
}

impl FormatHandler for CbzHandler {
    fn load_pages(&self, path: &Path) -> Result<PageSet> {
        let file = File::open(path).map_err(|e| AppError::from_io(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| AppError::corrupt(path, e))?;

        let mut pages = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| AppError::corrupt(path, e))?;

            if entry.is_dir() || !Self::is_image_file(entry.name()) {
                continue;
            }

            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| AppError::corrupt(path, format!("{}: {}", name, e)))?;

            pages.push(Page::memory(name, data));
        }

        tracing::debug!(path = %path.display(), pages = pages.len(), "Decoded archive pages");
        Ok(PageSet::new(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::item::PageContent;
    use std::io::Write;
    use zip::{CompressionMethod, ZipWriter};
    use zip::write::SimpleFileOptions;

    fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.add_directory("nested/", options).unwrap();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_is_image_file() {
        assert!(CbzHandler::is_image_file("001.jpg"));
        assert!(CbzHandler::is_image_file("001.JPEG"));
        assert!(CbzHandler::is_image_file("dir/001.Png"));
        assert!(!CbzHandler::is_image_file("notes.txt"));
        assert!(!CbzHandler::is_image_file("cover.webp"));
        assert!(!CbzHandler::is_image_file("ComicInfo.xml"));
    }

    #[test]
    fn test_only_images_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let cbz = dir.path().join("ch1.cbz");
        write_cbz(
            &cbz,
            &[
                ("002.JPG", b"second"),
                ("001.png", b"first"),
                ("notes.txt", b"ignore me"),
                ("nested/003.jpeg", b"third"),
            ],
        );

        let pages = CbzHandler.load_pages(&cbz).unwrap();

        let names: Vec<&str> = pages.names().collect();
        assert_eq!(names, ["001.png", "002.JPG", "nested/003.jpeg"]);
        assert!(!pages.contains("notes.txt"));
        assert!(!pages.contains("nested/"));
        assert_eq!(
            pages.get("001.png").unwrap().content,
            PageContent::Memory(b"first".to_vec().into())
        );
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let cbz = dir.path().join("broken.cbz");
        std::fs::write(&cbz, b"definitely not a zip file").unwrap();

        let err = CbzHandler.load_pages(&cbz).unwrap_err();
        assert!(matches!(err, AppError::CorruptArchive { .. }));
    }

    #[test]
    fn test_damaged_entry_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let cbz = dir.path().join("damaged.cbz");
        let payload = b"page-one-image-bytes";

        let mut zip = ZipWriter::new(File::create(&cbz).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("01.png", options).unwrap();
        zip.write_all(payload).unwrap();
        zip.finish().unwrap();

        // Stored entries keep the payload verbatim; flip one byte so the CRC check fails
        let mut bytes = std::fs::read(&cbz).unwrap();
        let offset = bytes
            .windows(payload.len())
            .position(|w| w == payload)
            .unwrap();
        bytes[offset] ^= 0xFF;
        std::fs::write(&cbz, &bytes).unwrap();

        let err = CbzHandler.load_pages(&cbz).unwrap_err();
        assert!(matches!(err, AppError::CorruptArchive { path, .. } if path == cbz));
    }

    #[test]
    fn test_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let cbz = dir.path().join("gone.cbz");

        let err = CbzHandler.load_pages(&cbz).unwrap_err();
        assert!(matches!(err, AppError::NotFound(p) if p == cbz));
    }
}
