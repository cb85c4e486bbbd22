use ship_coverage::app;
use ship_coverage::core::CONFIG_FILE;
use ship_coverage::utils::ConfigurationManager;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> ExitCode {
    let manager = match ConfigurationManager::load_or_default(CONFIG_FILE) {
        Ok(manager) => manager,
        Err(err) => {
            init_logging("info");
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let config = manager.get_config();
    init_logging(&config.log_level);

    match manager.config_file_path() {
        Some(path) => info!(path, "loaded configuration"),
        None => info!("using default configuration"),
    }
    for warning in manager.validate_config(config).warnings {
        warn!("{}", warning);
    }

    // The handler goes in after the prompt so signals still terminate a blocked read.
    let session = match app::start(config) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        handler_shutdown.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C handler: {err}");
    }

    match app::run(config, session, &shutdown) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "startup failed");
            ExitCode::FAILURE
        }
    }
}
