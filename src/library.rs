pub mod catalog;
pub mod item;

pub use catalog::{Catalog, Neighbor};
pub use item::{Item, ItemKind, Page, PageContent, PageSet};
