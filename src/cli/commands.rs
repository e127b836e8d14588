//! CLI command implementations
//!
//! `serve` boot sequence:
//! 1. Load config (defaults if the file is missing)
//! 2. Apply command line overrides and validate
//! 3. Set the log level
//! 4. Open the configured storage
//! 5. Build the HTTP server and run it on a tokio runtime

use std::fs;
use std::path::Path;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::storage::StorageError;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, host, port } => serve(&config, host, port),
    }
}

/// Write a default config file. Refuses to overwrite an existing one.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = Config::default().to_json_pretty()?;
    fs::write(config_path, json + "\n")?;

    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", &config_path.display().to_string()), ("written", "true")],
    );
    Ok(())
}

/// Resolve the effective configuration for `serve`.
pub fn resolve_config(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<Config> {
    let mut config = if config_path.exists() {
        let config = Config::load(config_path)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &config_path.display().to_string())],
        );
        config
    } else {
        log_event_with_fields(
            Event::ConfigDefaulted,
            &[("path", &config_path.display().to_string())],
        );
        Config::default()
    };

    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    config.validate()?;

    Ok(config)
}

/// Corrupted data is FATAL; other open failures are plain errors.
fn storage_open_failure_event(err: &StorageError) -> Event {
    if err.is_fatal() {
        Event::BootFailed
    } else {
        Event::StorageOpenFailed
    }
}

/// Open storage and serve the car API until ctrl-c
pub fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = resolve_config(config_path, host, port)?;
    Logger::set_min_severity(config.severity()?);

    let repository = config.storage.open().map_err(|e| {
        log_event_with_fields(
            storage_open_failure_event(&e),
            &[("error", &e.to_string()), ("code", e.code())],
        );
        CliError::from(e)
    })?;
    log_event_with_fields(
        Event::StorageOpened,
        &[("backend", config.storage.backend_name())],
    );

    let server = HttpServer::with_repository(config.http.clone(), repository);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}
