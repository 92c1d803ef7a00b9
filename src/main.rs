use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Explicit config file; otherwise `blueprint-wizard.toml` in the CWD is used when present.
    let config_path = args
        .iter()
        .find_map(|a| a.strip_prefix("--config="))
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    // Non-interactive scripted run against real timers.
    // Prints the collected params as JSON and exits 0/1.
    if args.iter().any(|a| a == "--scenario-smoke") {
        blueprint_wizard::run_scenario_smoke(config_path.as_deref());
        return;
    }

    // Non-interactive TUI smoke test mode (for automated checks).
    // Renders a single frame for a specific page and exits 0.
    // Usage: --smoke or --smoke=start|query|ready|loading|finished
    if let Some(arg) = args
        .iter()
        .find(|a| a.as_str() == "--smoke" || a.starts_with("--smoke="))
    {
        let target = arg
            .split_once('=')
            .map(|(_, v)| v.to_string())
            .filter(|v| !v.trim().is_empty());
        blueprint_wizard::run_tui_smoke(target, config_path.as_deref());
        return;
    }

    blueprint_wizard::run_tui(config_path.as_deref());
}
