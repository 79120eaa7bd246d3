use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Web reader for local manga and comic chapters.
#[derive(Parser, Debug, Clone)]
#[command(name = "manga-serve")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "MANGA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server options used when no subcommand is given.
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options of the `serve` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Directory holding chapter folders and .cbz files.
    #[arg(short, long, env = "MANGA_PATH")]
    pub manga_path: Option<PathBuf>,

    /// Port to listen on (all interfaces unless --bind is given).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Full address to bind the server to.
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the server (default if no command given).
    Serve(ServeArgs),

    /// Print the chapters found in the manga directory.
    List {
        /// Directory holding chapter folders and .cbz files.
        #[arg(short, long, env = "MANGA_PATH")]
        manga_path: Option<PathBuf>,
    },

    /// Create a default config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Library configuration.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Title shown on the chapter list.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            title: default_title(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::new(
        std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        5000,
    )
}

fn default_title() -> String {
    "Manga".to_string()
}

/// Library configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding chapter folders and .cbz files.
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("config.toml"),
            PathBuf::from("manga-serve.toml"),
            dirs::config_dir()
                .map(|p| p.join("manga-serve").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/manga-serve/config.toml"),
        ];

        candidates
            .into_iter()
            .find(|p| !p.as_os_str().is_empty() && p.exists())
    }

    /// Apply command line overrides. `bind` wins over `port`.
    pub fn apply_overrides(&mut self, args: ServeArgs) {
        if let Some(path) = args.manga_path {
            self.library.root = Some(path);
        }
        if let Some(port) = args.port {
            self.server.bind.set_port(port);
        }
        if let Some(addr) = args.bind {
            self.server.bind = addr;
        }
    }

    /// Absolute, existing library root.
    pub fn resolve_root(&self) -> crate::error::Result<PathBuf> {
        let root = self.library.root.as_ref().ok_or_else(|| {
            crate::error::AppError::Config(
                "No manga directory configured. Use --manga-path or [library] root".to_string(),
            )
        })?;

        let root = if root.is_absolute() {
            root.clone()
        } else {
            std::env::current_dir()?.join(root)
        };

        if !root.is_dir() {
            return Err(crate::error::AppError::Config(format!(
                "Manga directory is not a directory: {}",
                root.display()
            )));
        }

        Ok(root)
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# manga-serve configuration

[server]
bind = "0.0.0.0:5000"
title = "Manga"

[library]
# Directory holding chapter folders and .cbz files
# root = "/mnt/nas/Mangas/One Piece"
"#
        .to_string()
    }
}
