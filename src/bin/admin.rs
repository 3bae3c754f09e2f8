//! CLI administration tool for visit-counter.
//!
//! Inspects the visit store and the cached counter without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Store count, cached value and latest visits
//! cargo run --bin admin -- stats
//!
//! # Latest visits
//! cargo run --bin admin -- recent --limit 20
//!
//! # Cached counter
//! cargo run --bin admin -- cache show
//! cargo run --bin admin -- cache resync
//! cargo run --bin admin -- cache invalidate --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL` (or
//! `REDIS_*`) enables the cache commands. Unlike the server, the CLI never falls back
//! to a no-op cache: cache commands fail when Redis is missing or unreachable.

use visit_counter::config::{self, Config, mask_connection_string};
use visit_counter::domain::repositories::VisitRepository;
use visit_counter::infrastructure::cache::{CounterCache, RedisCounterCache};
use visit_counter::infrastructure::persistence::PgVisitRepository;
use visit_counter::server::connect_database;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing visit-counter.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show store and cache statistics
    Stats,

    /// List the most recent visits
    Recent {
        /// Number of visits to show
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Inspect or rebuild the cached counter
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Cached counter subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached value next to the store count
    Show,

    /// Overwrite the cached value with the store count
    Resync,

    /// Delete the cached value
    Invalidate {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

/// Redis as seen by the CLI.
enum CacheHandle {
    /// `REDIS_URL` is not set.
    Disabled,
    /// Configured, but the connection failed.
    Unreachable(String),
    Connected(RedisCounterCache),
}

impl CacheHandle {
    async fn connect(config: &Config) -> Self {
        let Some(url) = config.redis_url.as_deref() else {
            return Self::Disabled;
        };

        match RedisCounterCache::connect(url, config.cache_ttl_seconds, config.cache_timeout())
            .await
        {
            Ok(cache) => Self::Connected(cache),
            Err(e) => Self::Unreachable(e.to_string()),
        }
    }

    /// Returns the live cache, or an error when there is none to operate on.
    fn require(&self) -> Result<&dyn CounterCache> {
        match self {
            Self::Connected(cache) => Ok(cache as &dyn CounterCache),
            Self::Disabled => anyhow::bail!("Redis is not configured (REDIS_URL)"),
            Self::Unreachable(e) => anyhow::bail!("Redis is unreachable: {}", e),
        }
    }
}

/// Backends shared by every command.
struct Backends {
    store: PgVisitRepository,
    cache: CacheHandle,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Db {
            action: DbAction::Check,
        } => check_database(&config).await?,
        Commands::Stats => handle_stats(&connect(&config).await?).await?,
        Commands::Recent { limit } => {
            list_recent(&connect(&config).await?, i64::from(limit)).await?
        }
        Commands::Cache { action } => handle_cache_action(action, &connect(&config).await?).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<Backends> {
    let pool = connect_database(config).await?;
    let store =
        PgVisitRepository::new(Arc::new(pool)).with_query_timeout(config.db_query_timeout());
    let cache = CacheHandle::connect(config).await;

    Ok(Backends { store, cache })
}

/// Displays the store count, the cached counter and the latest visits.
async fn handle_stats(backends: &Backends) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = backends
        .store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count visits: {}", e))?;

    println!(
        "  Visits (store): {}",
        total.to_string().bright_white().bold()
    );
    print_cached(backends, total).await;
    println!();

    list_recent(backends, 5).await
}

/// Lists the newest visits.
///
/// # Output Format
///
/// ```text
/// 🕒 Recent visits
///
///   ID     IP address                Recorded
///   ──────────────────────────────────────────────────────
///   42     203.0.113.7               2025-01-15 10:30:12
/// ```
async fn list_recent(backends: &Backends, limit: i64) -> Result<()> {
    println!("{}", "🕒 Recent visits".bright_blue().bold());
    println!();

    let visits = backends
        .store
        .recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list visits: {}", e))?;

    if visits.is_empty() {
        println!("{}", "  No visits recorded yet".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<6} {:<25} {}",
        "ID".bright_white().bold(),
        "IP address".bright_white().bold(),
        "Recorded".bright_white().bold()
    );
    println!("  {}", "─".repeat(54).bright_black());

    for visit in &visits {
        println!(
            "  {:<6} {:<25} {}",
            visit.id.to_string().bright_black(),
            visit.ip_address.cyan(),
            visit
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black()
        );
    }

    println!();
    Ok(())
}

/// Dispatches cached counter commands.
///
/// Every action fails unless Redis is configured and reachable.
async fn handle_cache_action(action: CacheAction, backends: &Backends) -> Result<()> {
    let cache = backends.cache.require()?;

    match action {
        CacheAction::Show => {
            let total = backends
                .store
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count visits: {}", e))?;
            print_cached(backends, total).await;
        }
        CacheAction::Resync => {
            let count = backends
                .store
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count visits: {}", e))?;

            cache
                .set(count)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to write cached counter: {}", e))?;

            println!(
                "{} cached counter set to {}",
                "✅".green(),
                count.to_string().bright_white().bold()
            );
        }
        CacheAction::Invalidate { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete the cached visit counter?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            cache
                .invalidate()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to invalidate cache: {}", e))?;

            println!("{}", "✅ Cached counter deleted".green().bold());
        }
    }

    Ok(())
}

/// Prints the cached value and how far it is from the store count.
async fn print_cached(backends: &Backends, total: i64) {
    let cache = match &backends.cache {
        CacheHandle::Connected(cache) => cache,
        CacheHandle::Disabled => {
            println!("  Visits (cache): {}", "disabled".bright_black());
            return;
        }
        CacheHandle::Unreachable(e) => {
            println!("  Visits (cache): {}", format!("unreachable: {}", e).red());
            return;
        }
    };

    match cache.get().await {
        Ok(Some(cached)) if cached == total => {
            println!("  Visits (cache): {}", cached.to_string().green());
        }
        Ok(Some(cached)) => {
            println!(
                "  Visits (cache): {} {}",
                cached.to_string().yellow(),
                format!("(drift {:+})", cached - total).bright_black()
            );
        }
        Ok(None) => println!("  Visits (cache): {}", "miss".bright_black()),
        Err(e) => println!("  Visits (cache): {}", format!("error: {}", e).red()),
    }
}

/// Checks database connectivity and reports the visit count.
async fn check_database(config: &Config) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    if let Some(url) = &config.database_url {
        println!("  Database: {}", mask_connection_string(url).bright_black());
    }

    let pool = connect_database(config).await?;
    let store = PgVisitRepository::new(Arc::new(pool));

    if !store.health_check().await {
        anyhow::bail!("Database is reachable but not responding to queries");
    }

    println!("{}", "✅ Database connection OK".green().bold());

    match store.count().await {
        Ok(count) => println!("  Visits: {}", count.to_string().bright_white()),
        Err(e) => println!(
            "  {}",
            format!(
                "visits table not readable: {} (run the server once to migrate)",
                e
            )
            .yellow()
        ),
    }

    Ok(())
}
