//! Site Performance Auditor - Main CLI Application
//!
//! Estimates load time, audits page weight and compression, and tidies
//! image assets of a built static documentation site.

use clap::Parser;
use site_perf_audit::{
    app::App,
    cli::{resolve_color, Cli},
    config::EnvManager,
    error::AppError,
    VERSION, PKG_NAME,
};
use std::process;

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("{} v{} ({})", PKG_NAME, VERSION, env!("GIT_COMMIT"));
        process::exit(99);
    }));

    let cli = Cli::parse();
    let color_preference = cli.color_preference();

    if let Err(e) = App::new(cli).and_then(App::run) {
        // Resolved after the run so variables from .env count too
        let use_color = resolve_color(color_preference, |key| std::env::var(key).ok());
        eprintln!("{}", e.format_for_console(use_color));

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    if let Some(suggestion) = error.suggestion() {
        eprintln!();
        eprintln!("{}", suggestion);
    }

    if let AppError::Config(_) = error {
        eprintln!();
        eprintln!("{}", EnvManager::display_env_help());
    }
}
