//! CLI entry point for myls

use std::io::IsTerminal;
use std::process;

use myls::{ColorMode, ListingFormatter, OutputConfig, list, parse_arguments};

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = parse_arguments(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let output_config = OutputConfig::new(&options.config, should_use_color(options.color));
    let mut formatter = ListingFormatter::stdio(output_config);

    let code = list(&options.paths, options.config, &mut formatter);
    process::exit(code);
}
