// Blueprint onboarding wizard
// Main library entry point

pub mod config;
pub mod error;
pub mod models;
pub mod viewer;
pub mod wizard;

mod tui;
mod utils;

use crate::config::WizardConfig;
use crate::error::SetupError;
use log::{error, info};
use std::path::Path;

/// Initialize logging system with dual format (JSON + human-readable)
fn init_logging(with_console: bool, config: &WizardConfig) -> Result<(), SetupError> {
    let log_dir = utils::path_resolver::resolve_log_folder(config.log_dir.as_deref())?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");

    // JSON log file for structured parsing
    let json_log_file = log_dir.join(format!("wizard-{}.log", timestamp));

    // Human-readable log file (.txt)
    let txt_log_file = log_dir.join(format!("wizard-{}.txt", timestamp));

    // - JSON format to .log file
    // - Human-readable format to .txt file
    // - Optional: human-readable to stderr (disabled for TUI; stdout carries program output)
    let mut dispatch = fern::Dispatch::new().level(config.level_filter()?);

    if with_console {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    out.finish(format_args!(
                        "{}",
                        human_line(&timestamp_local.to_string(), message, record)
                    ));
                })
                .chain(std::io::stderr()),
        );
    }

    dispatch = dispatch
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_utc = chrono::Utc::now().to_rfc3339();
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let json_line = utils::logging::format_json_log(
                        &timestamp_utc,
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", json_line));
                })
                .chain(fern::log_file(json_log_file)?),
        )
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    out.finish(format_args!(
                        "{}\n",
                        human_line(&timestamp_local.to_string(), message, record)
                    ));
                })
                .chain(fern::log_file(txt_log_file)?),
        );

    dispatch.apply()?;

    info!(
        "[PHASE: initialization] Logging initialized, log directory: {:?}",
        log_dir
    );
    Ok(())
}

fn human_line(timestamp: &str, message: &std::fmt::Arguments<'_>, record: &log::Record<'_>) -> String {
    let message_str = format!("{}", message);
    let (phase, step, cleaned_message) = utils::logging::parse_log_metadata(&message_str);
    utils::logging::format_human_readable_log(
        timestamp,
        record.level(),
        record.target(),
        &cleaned_message,
        phase.as_deref(),
        step.as_deref(),
    )
}

/// Loads configuration or exits with status 2.
fn load_config(path: Option<&Path>) -> WizardConfig {
    match WizardConfig::load(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Blueprint Setup: {}", e);
            std::process::exit(2);
        }
    }
}

fn log_startup(mode: &str, config: &WizardConfig) {
    info!(
        "[PHASE: initialization] Blueprint wizard ({}) starting at {}",
        mode,
        chrono::Utc::now()
    );
    info!(
        "[PHASE: initialization] [STEP: deployment_folder] Deployment folder: {:?}",
        utils::path_resolver::resolve_deployment_folder()
    );
    info!(
        "[PHASE: initialization] [STEP: config] Effective config:\n{}",
        config.to_toml()
    );
}

pub fn run_tui(config_path: Option<&Path>) {
    let config = load_config(config_path);

    // Initialize logging (no stdout to avoid corrupting the TUI)
    if let Err(e) = init_logging(false, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log_startup("tui", &config);

    // Timers run on worker threads while the terminal loop blocks the main thread.
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("[PHASE: tui] [STEP: fatal] Failed to create async runtime: {}", e);
            eprintln!("Blueprint Setup error: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = rt.enter();

    if let Err(e) = tui::run(&config) {
        error!("[PHASE: tui] [STEP: fatal] TUI exited with error: {:?}", e);
        eprintln!("Blueprint Setup error: {}", e);
        std::process::exit(1);
    }
}

/// Non-interactive TUI smoke mode (for automated checks).
/// Renders a single frame into an in-memory terminal and exits.
pub fn run_tui_smoke(target: Option<String>, config_path: Option<&Path>) {
    let config = load_config(config_path);
    if let Err(e) = init_logging(false, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log_startup("tui-smoke", &config);

    let target = target.as_deref().unwrap_or("start");
    match tui::smoke(target) {
        Ok(frame) => {
            info!(
                "[PHASE: tui] [STEP: smoke] Rendered target={} ({} bytes)",
                target,
                frame.len()
            );
            println!("{}", frame);
        }
        Err(e) => {
            error!(
                "[PHASE: tui] [STEP: smoke] TUI smoke exited with error: {:?}",
                e
            );
            eprintln!("Blueprint Setup error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Runs the scripted end-to-end scenario against real timers and prints the final params as JSON.
pub fn run_scenario_smoke(config_path: Option<&Path>) {
    let config = load_config(config_path);
    if let Err(e) = init_logging(true, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log_startup("scenario-smoke", &config);

    match scenario_smoke_output(&config) {
        Ok(json) => {
            info!("[PHASE: scenario] [STEP: done] Scenario passed");
            println!("{}", json);
        }
        Err(e) => {
            error!("[PHASE: scenario] [STEP: fatal] Scenario failed: {:?}", e);
            eprintln!("Scenario smoke failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Final params of the scripted scenario as pretty JSON. Nothing else goes to stdout in this mode.
fn scenario_smoke_output(config: &WizardConfig) -> anyhow::Result<String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create async runtime for scenario smoke: {}", e))?;
    let report = rt.block_on(wizard::scenario::run_scenario(config.timings()))?;
    Ok(serde_json::to_string_pretty(&report.params)?)
}
