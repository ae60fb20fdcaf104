// src/main.rs
use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use linklog::cli::args::{Cli, Commands};
use linklog::config::{load_settings, Settings};
use linklog::exitcode;
use linklog::infrastructure::di::ServiceContainer;
use tracing::debug;
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt,
    prelude::*,
};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if cli.generate_config {
        println!("{}", linklog::config::generate_default_config());
        std::process::exit(exitcode::SUCCESS);
    }

    // Without a subcommand there is nothing to do; show help before any
    // settings or database are touched.
    if cli.command.is_none() {
        let _ = Cli::command().print_help();
        std::process::exit(exitcode::USAGE);
    }

    // Load configuration with CLI overrides
    let mut settings = load_settings(cli.config.as_deref()).unwrap_or_else(|e| {
        debug!("Failed to load settings: {}. Using defaults.", e);
        Settings::default()
    });

    if let Some(Commands::Sync { count, tag }) = &cli.command {
        if let Some(count) = count {
            settings.fetch_count = *count;
        }
        if let Some(tag) = tag {
            settings.fetch_tag = Some(tag.clone());
        }
    }

    // Single composition root
    let services = match ServiceContainer::new(&settings) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("{}: {}", "Failed to create service container".red(), e);
            std::process::exit(exitcode::USAGE);
        }
    };

    if let Err(e) = linklog::cli::execute_command(&cli, &services) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(exitcode::USAGE);
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Create a noisy module filter
    let noisy_modules = ["reqwest", "mio", "want", "hyper_util"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // stderr keeps stdout passable to downstream processes
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter).with_filter(module_filter))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_cli_command_when_verify_then_debug_asserts_pass() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }
}
