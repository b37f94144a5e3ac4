use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use expenses::{ExpensesConfig, ExpensesModule};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig, StorageBackend};
use sea_orm::{ConnectOptions, Database};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Adds `mode=rwc` so a missing database file is created.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.contains("mode=") => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case("sqlite::memory:") {
        return Ok("sqlite");
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Relative paths (data file, sqlite file, logs) resolve against the config
/// file's directory, or the working directory when no file is given.
fn base_dir_for(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path.and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.to_path_buf()),
        _ => std::env::current_dir().context("Cannot determine working directory"),
    }
}

fn resolve_path(raw: &str, base_dir: &Path) -> PathBuf {
    let p = PathBuf::from(raw);
    if p.is_absolute() {
        p
    } else {
        base_dir.join(p)
    }
}

/// Expenses Server - personal expense tracking API
#[derive(Parser)]
#[command(name = "expenses-server")]
#[command(about = "Expenses Server - personal expense tracking API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON data file for file storage (overrides config)
    #[arg(long)]
    data_file: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Replace the stored expenses with the sample data set
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        data_file: cli.data_file.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let base_dir = base_dir_for(cli.config.as_deref())?;

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &base_dir);
    tracing::info!("Expenses Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, &base_dir).await,
        Commands::Check => check_config(config),
        Commands::Seed => seed_storage(config, &base_dir).await,
    }
}

/// Bind the configured storage backend to the expenses module.
async fn open_module(config: &AppConfig, base_dir: &Path) -> Result<ExpensesModule> {
    let module_cfg: ExpensesConfig = config.module_config("expenses")?;

    match config.storage.backend() {
        StorageBackend::File => {
            let path = resolve_path(&config.storage.data_file, base_dir);
            tracing::info!("Using file storage at {}", path.display());
            Ok(ExpensesModule::with_file_storage(path, module_cfg).await)
        }
        StorageBackend::Database => {
            let db_config = config
                .storage
                .database
                .as_ref()
                .ok_or_else(|| anyhow!("Database URL not configured"))?;
            let backend = detect_from_dsn(db_config)?;

            let mut dsn = db_config.url.trim().to_owned();
            if dsn.starts_with("sqlite://") {
                dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
            }

            let mut opts = ConnectOptions::new(dsn.clone());
            opts.max_connections(db_config.max_conns.unwrap_or(10))
                .acquire_timeout(Duration::from_millis(
                    db_config.acquire_timeout_ms.unwrap_or(5000) as u64,
                ))
                .sqlx_logging(false);

            tracing::info!("Connecting to {} database", backend);
            let conn = Database::connect(opts)
                .await
                .with_context(|| format!("Failed to connect to database '{}'", dsn))?;
            ExpensesModule::with_database(conn, module_cfg).await
        }
    }
}

async fn run_server(config: AppConfig, base_dir: &Path) -> Result<()> {
    tracing::info!("Initializing expenses module...");
    let module = open_module(&config, base_dir).await?;

    let timeout = match config.server.timeout_sec {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let router = module.router(timeout, config.server.cors_enabled);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        "Listening on http://{} (storage: {})",
        listener.local_addr()?,
        module.service().storage_kind().as_str()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = wait_for_shutdown().await {
                tracing::warn!("shutdown: signal listener failed: {}; falling back to ctrl_c()", e);
                let _ = tokio::signal::ctrl_c().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let backend = config.storage.backend();
    if backend == StorageBackend::Database {
        if let Some(db) = &config.storage.database {
            detect_from_dsn(db)?;
        }
    }
    config.module_config::<ExpensesConfig>("expenses")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed (storage: {})", backend.as_str());
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn seed_storage(config: AppConfig, base_dir: &Path) -> Result<()> {
    let module = open_module(&config, base_dir).await?;
    let report = expenses::seed::seed(&module.service())
        .await
        .map_err(|e| anyhow!("Seeding failed: {}", e))?;

    println!(
        "Seeded {} expenses ({} removed)",
        report.inserted, report.removed
    );
    Ok(())
}
