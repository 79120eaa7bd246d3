mod cbz;
mod folder;

pub use cbz::CbzHandler;
pub use folder::FolderHandler;

use crate::error::Result;
use crate::library::item::{ItemKind, PageSet};
use std::path::Path;

/// Trait for kind-specific page resolvers.
pub trait FormatHandler: Send + Sync {
    /// Resolve every page stored at `path`.
    fn load_pages(&self, path: &Path) -> Result<PageSet>;
}

/// Get the resolver for an item kind.
pub fn get_handler(kind: ItemKind) -> &'static dyn FormatHandler {
    match kind {
        ItemKind::Directory => &FolderHandler,
        ItemKind::Archive => &CbzHandler,
    }
}
