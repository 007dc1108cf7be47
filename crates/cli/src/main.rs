use clap::Parser;
use spedilo_client::{AppError, config::ConfigArgs};

mod commands;
mod export;
mod prompt;
mod render;

#[derive(Parser, Debug)]
#[command(name = "spedilo")]
#[command(about = "Track personal expenses against a Spedilo server")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match spedilo_client::config::load(cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spedilo={level},spedilo_client={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = commands::run(config, cli.command).await {
        match err {
            AppError::Terminal(message) => eprintln!("{message}"),
            AppError::Client(err) => eprintln!("{}", err.user_message("Request failed")),
            other => eprintln!("error: {other}"),
        }
        std::process::exit(1);
    }
}
