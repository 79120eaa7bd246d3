//! manga-serve: a lightweight web reader for local manga and comics.
//!
//! Every directory or `.cbz` archive directly under the manga directory is a
//! chapter. Chapters are listed in name order, read page by page in the
//! browser, and chained together with next/previous links.
//!
//! # Features
//!
//! - Folder chapters (loose images) and CBZ chapters (zipped images)
//! - Chapter list, reader page and next/previous navigation
//! - Raw image serving, streamed from disk or from decoded archives
//! - JSON API mirroring the HTML pages
//! - Catalog scanned once and page sets cached in memory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration and CLI.
pub mod config;
/// Error types.
pub mod error;
/// Folder and archive page resolvers.
pub mod formats;
/// Chapter catalog and page models.
pub mod library;
/// HTTP server.
pub mod server;


pub use config::{Cli, Command, Config};
pub use error::{AppError, Result};
pub use library::Catalog;
pub use server::AppState;
