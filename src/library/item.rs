//! Item and page models.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How an item stores its images on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Directory of loose image files.
    Directory,
    /// CBZ (Comic Book ZIP) archive.
    Archive,
}

impl ItemKind {
    /// Detect the item kind of a root entry, or `None` if it isn't an item.
    pub fn detect(path: &Path, is_dir: bool) -> Option<Self> {
        if is_dir {
            return Some(ItemKind::Directory);
        }

        let ext = path.extension()?.to_str()?;
        ext.eq_ignore_ascii_case("cbz").then_some(ItemKind::Archive)
    }
}

/// A browsable chapter: a directory or a `.cbz` file directly under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Filesystem base name, used as identifier and title.
    pub name: String,

    /// Path to the directory or archive.
    pub location: PathBuf,

    /// Storage kind.
    pub kind: ItemKind,
}

impl Item {
    /// Create an item from a root entry.
    pub fn new(name: impl Into<String>, location: PathBuf, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            location,
            kind,
        }
    }

    /// Display title (the name, unformatted).
    pub fn title(&self) -> &str {
        &self.name
    }
}

/// Where the bytes of a page come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Loose file, read only when served.
    File(PathBuf),
    /// Entry decoded out of an archive.
    Memory(Arc<[u8]>),
}

/// One image within an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Entry name, used as label and lookup key.
    pub name: String,

    /// Image source.
    pub content: PageContent,
}

impl Page {
    /// Page backed by a file on disk.
    pub fn file(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            content: PageContent::File(path),
        }
    }

    /// Page backed by an in-memory buffer.
    pub fn memory(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: PageContent::Memory(data.into()),
        }
    }

    /// MIME type guessed from the page extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// All pages of one item, addressable by name and kept in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet {
    pages: Vec<Page>,
    index: HashMap<String, usize>,
}

impl PageSet {
    /// Build a page set, ordering pages naturally by name.
    pub fn new(mut pages: Vec<Page>) -> Self {
        pages.sort_by(|a, b| natord_compare(&a.name, &b.name));

        let index = pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.name.clone(), i))
            .collect();

        Self { pages, index }
    }

    /// Look up a page by name.
    pub fn get(&self, name: &str) -> Option<&Page> {
        self.index.get(name).map(|&i| &self.pages[i])
    }

    /// Whether a page with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Pages in reading order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Page names in reading order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.name.as_str())
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the item has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Natural string comparison for sorting.
pub fn natord_compare(a: &str, b: &str) -> std::cmp::Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek(), b_chars.peek()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return std::cmp::Ordering::Less,
            (Some(_), None) => return std::cmp::Ordering::Greater,
            (Some(&ac), Some(&bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let a_num = take_digits(&mut a_chars);
                    let b_num = take_digits(&mut b_chars);

                    // Longer digit runs (after leading zeros) are larger numbers
                    let a_trim = a_num.trim_start_matches('0');
                    let b_trim = b_num.trim_start_matches('0');
                    match a_trim.len().cmp(&b_trim.len()).then(a_trim.cmp(b_trim)) {
                        std::cmp::Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    a_chars.next();
                    b_chars.next();

                    match ac.to_lowercase().cmp(bc.to_lowercase()) {
                        std::cmp::Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natord_compare() {
        assert_eq!(natord_compare("page1", "page2"), std::cmp::Ordering::Less);
        assert_eq!(natord_compare("page2", "page10"), std::cmp::Ordering::Less);
        assert_eq!(
            natord_compare("page10", "page2"),
            std::cmp::Ordering::Greater
        );
        assert_eq!(natord_compare("Page1", "page1.png"), std::cmp::Ordering::Less);
        assert_ne!(natord_compare("a.png", "A.png"), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_natord_keeps_digit_after_run() {
        // A digit run ends at the first non-digit, which is then compared normally.
        assert_eq!(
            natord_compare("01a.png", "01b.png"),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_item_kind_detect() {
        assert_eq!(
            ItemKind::detect(Path::new("/m/ch1"), true),
            Some(ItemKind::Directory)
        );
        assert_eq!(
            ItemKind::detect(Path::new("/m/ch1.CBZ"), false),
            Some(ItemKind::Archive)
        );
        assert_eq!(ItemKind::detect(Path::new("/m/notes.txt"), false), None);
        assert_eq!(ItemKind::detect(Path::new("/m/README"), false), None);
    }

    #[test]
    fn test_page_set_order_and_lookup() {
        let set = PageSet::new(vec![
            Page::memory("p10.png", vec![10]),
            Page::memory("p2.png", vec![2]),
            Page::memory("p1.png", vec![1]),
        ]);

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, ["p1.png", "p2.png", "p10.png"]);
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.get("p2.png").map(|p| p.content.clone()),
            Some(PageContent::Memory(vec![2].into()))
        );
        assert!(set.get("p3.png").is_none());
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(Page::memory("a.PNG", vec![]).mime_type(), "image/png");
        assert_eq!(Page::memory("a.jpeg", vec![]).mime_type(), "image/jpeg");
        assert_eq!(
            Page::file("info.txt", PathBuf::from("/x/info.txt")).mime_type(),
            "application/octet-stream"
        );
    }
}
