//! manga-serve entry point.

use clap::Parser;
use manga_serve::{
    Catalog,
    config::{Cli, Command, Config, ServeArgs},
    server,
};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    match cli.command {
        Some(Command::Init { force }) => cmd_init(force),
        Some(Command::List { manga_path }) => cmd_list(config, manga_path),
        Some(Command::Serve(args)) => cmd_serve(config, args).await,
        None => cmd_serve(config, cli.serve).await,
    }
}

/// Write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("config.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());
    println!("\nSet [library] root in config.toml, then run: manga-serve serve");

    Ok(())
}

/// Print the catalog.
fn cmd_list(mut config: Config, manga_path: Option<PathBuf>) -> anyhow::Result<()> {
    config.apply_overrides(ServeArgs {
        manga_path,
        ..ServeArgs::default()
    });
    let catalog = Catalog::new(config.resolve_root()?);

    let items = catalog.list_items()?;
    if items.is_empty() {
        println!("No chapters found in {}", catalog.root().display());
        return Ok(());
    }

    println!("{:<10} NAME", "KIND");
    println!("{}", "-".repeat(60));
    for item in items {
        let kind = match item.kind {
            manga_serve::library::ItemKind::Directory => "folder",
            manga_serve::library::ItemKind::Archive => "cbz",
        };
        println!("{:<10} {}", kind, item.title());
    }

    Ok(())
}

/// Start the server.
async fn cmd_serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    config.apply_overrides(args);

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manga_serve=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root = config.resolve_root()?;
    tracing::info!(
        bind = %config.server.bind,
        root = %root.display(),
        "Starting manga-serve"
    );

    let bind = config.server.bind;
    let state = server::AppState::new(config, Catalog::new(root));

    // Warm the item list so the first request doesn't pay for the scan
    match state.with_catalog(|catalog| catalog.len()).await {
        Ok(count) => tracing::info!(chapters = count, "Catalog ready"),
        Err(e) => tracing::warn!(error = %e, "Initial scan failed, will retry on request"),
    }

    let app = server::create_router(state);

    let listener = TcpListener::bind(bind).await?;
    tracing::info!(address = %bind, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
