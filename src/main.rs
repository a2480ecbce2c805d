use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use query_search::app::{run_tui_app, SearchApp};
use query_search::config::Config;
use query_search::utils::{app_paths::AppPaths, logging};
use query_search::Location;

fn print_help() {
    println!("{}", "query-search - search box synced with the address".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  query-search [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}  - Starting address, e.g. /invoices?query=lee", "--url <ADDRESS>".green());
    println!("  {} - Text shown while the box is empty", "--placeholder <TEXT>".green());
    println!("  {}    - Quiet period before the address updates", "--debounce-ms <N>".green());
    println!("  {}    - Write a commented config file", "--generate-config".green());
    println!("  {}               - Print final query parameters as JSON", "--json".green());
    println!("  {}               - Show this help", "--help".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}        - Apply the search now", "Enter".green());
    println!("  {}          - Cancel a pending update, or quit", "Esc".green());
    println!("  {}       - Follow a next-page link", "Ctrl+P".green());
    println!("  {} - History back/forward", "Alt+Left/Right".green());
    println!("  {}       - Quit", "Ctrl+C".green());
}

/// Value following `flag` on the command line
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|arg| arg == flag) {
        Some(index) => match args.get(index + 1) {
            Some(value) => Ok(Some(value.as_str())),
            None => bail!("{} requires a value", flag),
        },
        None => Ok(None),
    }
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--generate-config") {
        return generate_config();
    }

    let (log_buffer, log_path) = logging::init_tracing(Some(&AppPaths::log_dir()));
    if let Some(path) = &log_path {
        eprintln!("Debug logs will be written to: {}", path.display());
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(target: "config", "Using default config: {:#}", e);
        Config::default()
    });

    if let Some(url) = flag_value(&args, "--url")? {
        config.location.initial_address = url.to_string();
    }
    if let Some(placeholder) = flag_value(&args, "--placeholder")? {
        config.search.placeholder = placeholder.to_string();
    }
    if let Some(ms) = flag_value(&args, "--debounce-ms")? {
        config.search.debounce_ms = ms
            .parse()
            .with_context(|| format!("Invalid --debounce-ms value '{}'", ms))?;
    }

    let mut app = SearchApp::new(&config, Some(log_buffer));
    run_tui_app(&mut app)?;

    if args.iter().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&app.location().query_state())?);
    } else {
        println!("{}", app.location().href());
    }

    Ok(())
}
