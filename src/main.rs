use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use lurk::app::{App, SYNCED_AT_KEY};
use lurk::config::Config;
use lurk::model::Row;
use lurk::storage::{Database, DatabaseError};
use lurk::{index, ui};

/// Get the config directory path (~/.config/lurk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("lurk"))
}

#[derive(Parser, Debug)]
#[command(name = "lurk", about = "Terminal forum browser")]
struct Args {
    /// Import a forum index JSON file into the database
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Print the computed forum list once and exit (no TUI)
    #[arg(long)]
    dump_rows: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // User-only access on Unix: the database carries local state.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }

    let config = Config::load(&config_dir.join("config.toml")).context("Failed to load config")?;
    let db_path = config_dir.join("forums.db");

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of lurk appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    // Handle --import flag
    if let Some(import_file) = &args.import {
        // Resolve symlinks and insist on a regular file before reading.
        let canonical = import_file
            .canonicalize()
            .with_context(|| format!("Failed to resolve import file: {}", import_file.display()))?;
        if !std::fs::metadata(&canonical)?.is_file() {
            anyhow::bail!("Import path must be a regular file");
        }

        let flattened = index::load(&canonical)
            .await
            .context("Failed to parse forum index")?;
        let stats = db
            .sync_index(&flattened.groups, &flattened.forums)
            .await
            .context("Failed to sync forum index")?;
        db.set_meta(SYNCED_AT_KEY, &Utc::now().format("%Y-%m-%d %H:%M").to_string())
            .await?;
        println!(
            "Imported {} forums in {} groups ({} pruned) from {}",
            stats.forums,
            stats.groups,
            stats.pruned,
            canonical.display()
        );
    }

    // Create app state and load initial data
    let mut app = App::new(db.clone(), &config);
    app.synced_at = db.get_meta(SYNCED_AT_KEY).await?;
    app.reload().await.context("Failed to load forum list")?;
    // The initial build is not a change; start with a quiet status line.
    app.status_message = None;
    app.select_first();

    if app.builder.is_empty() && args.import.is_none() {
        eprintln!("No forums in the database.");
        eprintln!();
        eprintln!("To get started, import a forum index:");
        eprintln!("  lurk --import /path/to/forums.json");
        std::process::exit(1);
    }

    // Handle --dump-rows: print the computed list headlessly and exit
    if args.dump_rows {
        for row in app.builder.rows() {
            match row {
                Row::Header(title) => println!("== {} ==", title),
                Row::Forum(card) | Row::Favorite(card) => {
                    let star = if card.favorite { "★ " } else { "" };
                    println!("{}{}{}", "  ".repeat(card.indent + 1), star, card.name);
                }
            }
        }
        return Ok(());
    }

    // Run the TUI
    ui::run(&mut app).await?;

    println!("Goodbye!");
    Ok(())
}
