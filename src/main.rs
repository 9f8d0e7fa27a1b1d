use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use willow::{commands, config};

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "willow")]
#[command(about = "Willow web browser chrome", long_about = "Willow web browser chrome\n\nIf no command is specified, the program starts an interactive browsing session.")]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the URL the location bar would load for some text
    Resolve {
        /// Text as typed into the location bar (e.g. "wiki rust")
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Fetch the favicon of a site
    Favicon {
        /// Location on the site (e.g. example.com/page)
        location: String,

        /// Save the decoded icon as a PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Save a location to disk
    Download {
        /// Location to download
        location: String,

        /// Output file (default: the last path segment of the location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Display current configuration
    Config,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command() {
    let cfg = config::read();

    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("home_location: {}", cfg.home_location);
    println!("history_limit: {}", cfg.history_limit);
    println!("bookmarks:");
    for bookmark in &cfg.bookmarks {
        println!("  {}", bookmark);
    }
    println!();
    println!("[favicon]");
    println!("cache_capacity: {}", cfg.favicon.cache_capacity);
    println!("workers: {}", cfg.favicon.workers);
    println!("icon_size: {}", cfg.favicon.icon_size);
    match cfg.favicon.timeout_secs {
        Some(secs) => println!("timeout_secs: {}", secs),
        None => println!("timeout_secs: (client default)"),
    }
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a config::Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(config: &config::Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config => {
            handle_config_command();
            Ok(())
        }
        Commands::Resolve { text } => {
            commands::resolve::run(&text);
            Ok(())
        }
        Commands::Favicon { location, output } => {
            commands::favicon::run(config, &location, output).await
        }
        Commands::Download { location, output } => {
            commands::download::run(&location, output).await
        }
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    let Some(command) = cli.command else {
        if let Err(e) = commands::shell::run(&config).await {
            eprintln!("Error running browser session: {:#}", e);
            std::process::exit(1);
        }
        return;
    };

    if let Err(e) = execute_command(&config, command).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
