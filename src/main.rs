use folderkit::cli::{AppConfig, Args};
use folderkit::commands::execute;
use folderkit::config::UserConfig;
use folderkit::domain::store::FolderStore;
use folderkit::error::{FolderKitError, Result};
use folderkit::storage::JsonFileBackend;

use std::io;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    // Logs go to stderr so command output stays clean
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = args.log_directive().parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let offers_choice = args.command.accepts_conflict_choice();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if e.is_conflict() && offers_choice {
            eprintln!("(Pass --on-conflict replace or --on-conflict rename to resolve it)");
        }
        std::process::exit(1);
    }
}

/// Opens the store and runs the requested command
fn run(args: Args) -> Result<()> {
    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::new(&args, user_config);
    let path = config.data_file.clone().ok_or_else(|| {
        FolderKitError::ConfigError(
            "Could not determine data directory; pass --data <file>".to_string(),
        )
    })?;

    tracing::debug!(path = %path.display(), "opening folder store");
    let mut store =
        FolderStore::open(JsonFileBackend::new(path))?.with_default_color(config.user.default_color);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args.command, &config, &mut store, &mut out)
}
