//! voice-identify CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_identify::cli::{
    app::{load_merged_config, run_mcp, run_stdio, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging,
    presenter::Presenter,
};
use voice_identify::infrastructure::XdgConfigStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cli_config = cli.to_config();

    match cli.command {
        Some(Commands::Config { action }) => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Mcp { .. }) => run_mcp(load_merged_config(cli_config).await).await,
        Some(Commands::Stdio) | None => run_stdio(load_merged_config(cli_config).await).await,
    }
}
