//! SkillPilot command-line front end.

mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, LogFormat, handle_play_command, handle_projects_command,
    handle_validate_command,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Validate { path, format } => handle_validate_command(path, format)?,
        Commands::Projects { path } => handle_projects_command(path)?,
        Commands::Play {
            path,
            project,
            config,
            state_dir,
            seed,
        } => handle_play_command(path, project, config, state_dir, seed).await?,
    }

    Ok(())
}

/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
