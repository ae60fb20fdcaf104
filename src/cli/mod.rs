// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::infrastructure::di::ServiceContainer;

pub mod args;
pub mod commands;
pub mod error;

pub fn execute_command(cli: &Cli, services: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Sync { .. }) => commands::sync(services),
        Some(Commands::Render) => commands::render(services),
        Some(Commands::Backfill { file, execute }) => {
            commands::backfill(services, file, *execute)
        }
        // main prints help and exits before dispatch; reaching this arm
        // means a caller skipped that check.
        None => Err(CliError::InvalidInput("no command given".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::util::testing::init_test_env;

    #[test]
    fn given_no_subcommand_when_execute_then_usage_error_not_silent_ok() {
        init_test_env();
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.db_url = dir
            .path()
            .join("cli-test.db")
            .to_str()
            .unwrap()
            .to_string();

        let services = ServiceContainer::new(&settings).unwrap();
        let cli = Cli {
            config: None,
            debug: 0,
            generate_config: false,
            command: None,
        };

        let result = execute_command(&cli, &services);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
