//! Item discovery, ordering, navigation and caching.

use crate::error::{AppError, Result};
use crate::formats;
use crate::library::item::{Item, ItemKind, Page, PageSet};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Result of a next/previous lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Neighbor {
    /// Adjacent item name.
    Item(String),
    /// No further item in that direction.
    EndOfCatalog,
}

/// Sorted item list plus a name index built from the same scan.
#[derive(Debug)]
struct ItemIndex {
    items: Vec<Item>,
    positions: HashMap<String, usize>,
}

impl ItemIndex {
    fn position(&self, name: &str) -> Result<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| AppError::UnknownItem(name.to_string()))
    }
}

/// Catalog of the items found directly under a root directory.
///
/// The item list is scanned once, on first use, and never refreshed. Page
/// sets are resolved on first request per item and kept for the lifetime
/// of the catalog.
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
    items: OnceLock<ItemIndex>,
    pages: parking_lot::RwLock<HashMap<String, Arc<PageSet>>>,
}

impl Catalog {
    /// Create an unscanned catalog for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            items: OnceLock::new(),
            pages: parking_lot::RwLock::new(HashMap::new()),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All items sorted by name.
    pub fn list_items(&self) -> Result<&[Item]> {
        Ok(&self.index()?.items)
    }

    /// Number of items.
    pub fn len(&self) -> Result<usize> {
        Ok(self.index()?.items.len())
    }

    /// Whether the root holds no items.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Result<&Item> {
        let index = self.index()?;
        Ok(&index.items[index.position(name)?])
    }

    /// Pages of an item, resolved on first request and cached afterwards.
    pub fn get_pages(&self, name: &str) -> Result<Arc<PageSet>> {
        if let Some(pages) = self.pages.read().get(name) {
            return Ok(Arc::clone(pages));
        }

        let item = self.item(name)?;

        // Resolve without holding the lock; a concurrent first access may do the same work
        let start = std::time::Instant::now();
        let resolved = formats::get_handler(item.kind).load_pages(&item.location)?;
        tracing::info!(
            item = %item.name,
            kind = ?item.kind,
            pages = resolved.len(),
            elapsed = ?start.elapsed(),
            "Resolved pages"
        );

        let mut cache = self.pages.write();
        let pages = cache
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(resolved));
        Ok(Arc::clone(pages))
    }

    /// A single page of an item.
    pub fn get_page(&self, name: &str, page: &str) -> Result<Page> {
        self.get_pages(name)?
            .get(page)
            .cloned()
            .ok_or_else(|| AppError::UnknownPage {
                item: name.to_string(),
                page: page.to_string(),
            })
    }

    /// Item following `name` in catalog order.
    pub fn next_item(&self, name: &str) -> Result<Neighbor> {
        let index = self.index()?;
        let pos = index.position(name)?;

        Ok(match index.items.get(pos + 1) {
            Some(item) => Neighbor::Item(item.name.clone()),
            None => Neighbor::EndOfCatalog,
        })
    }

    /// Item preceding `name` in catalog order.
    pub fn previous_item(&self, name: &str) -> Result<Neighbor> {
        let index = self.index()?;
        let pos = index.position(name)?;

        Ok(match pos.checked_sub(1) {
            Some(prev) => Neighbor::Item(index.items[prev].name.clone()),
            None => Neighbor::EndOfCatalog,
        })
    }

    /// Scanned item index, scanning on first call.
    fn index(&self) -> Result<&ItemIndex> {
        if let Some(index) = self.items.get() {
            return Ok(index);
        }

        let scanned = self.scan()?;
        // First completed scan wins; a racing duplicate is dropped
        Ok(self.items.get_or_init(|| scanned))
    }

    /// Enumerate direct children of the root that are items.
    fn scan(&self) -> Result<ItemIndex> {
        let start = std::time::Instant::now();
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| AppError::from_io(&self.root, e))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            let Some(kind) = ItemKind::detect(&path, path.is_dir()) else {
                continue;
            };

            // Broken symlinks and special files are not archives
            if kind == ItemKind::Archive && !path.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::warn!(path = %path.display(), "Skipping item with non UTF-8 name");
                continue;
            };

            items.push(Item::new(name, path, kind));
        }

        items.sort_by(|a, b| a.name.cmp(&b.name));

        let positions = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();

        tracing::info!(
            root = %self.root.display(),
            items = items.len(),
            elapsed = ?start.elapsed(),
            "Scanned catalog"
        );

        Ok(ItemIndex { items, positions })
    }
}
