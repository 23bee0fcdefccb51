use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cadastro::config::Overrides;
use cadastro::{Config, Loader};

#[derive(Debug, Parser)]
#[command(name = "cadastro", version, about = "JSON CRUD service for dados and cidades")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind.
    #[arg(long, short, global = true)]
    port: Option<u16>,

    /// Database URL (file path, `:memory:` or `libsql://...`).
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Create the tables before serving.
    #[arg(long, global = true)]
    init_db: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Create the tables and exit.
    InitDb,
}

fn init_tracing(cli: &Cli) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> cadastro::Result<Config> {
    Loader::default().load(
        cli.config.as_deref(),
        &Overrides {
            host: cli.host.as_deref(),
            port: cli.port,
            database_url: cli.database_url.as_deref(),
            init_db: cli.init_db,
        },
    )
}

async fn run(cli: Cli) -> cadastro::Result<()> {
    let config = load_config(&cli)?;
    let db = cadastro::db::connect(&config.database.url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => db.init_schema().await,
        Command::Serve => {
            if config.database.init_on_start {
                db.init_schema().await?;
            }

            let mut server =
                cadastro::server::start(config, db, cadastro::router().into_handle()).await?;

            // Either Ctrl-C or the accept loop dying ends the process.
            let stopped = tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    None
                }
                result = server.wait() => Some(result),
            };

            match stopped {
                Some(result) => result,
                None => server.shutdown().await,
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
