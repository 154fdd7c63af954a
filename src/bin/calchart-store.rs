use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use calchart_store::{calchart_migrator, FileShowBackend, ShowBackend, StoreConfig};

#[derive(Parser)]
#[command(name = "calchart-store", about = "Maintain and serve the Calchart show store")]
struct Cli {
    /// Data directory (overrides CALCHART_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upgrade every stored show document to the current schema version
    Migrate,
    /// Print every show record as one JSON object per line
    List,
    /// Serve the show actions over HTTP
    #[cfg(feature = "http")]
    Serve {
        /// Bind address (overrides CALCHART_BIND_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::info!("Using data directory: {}", config.data_dir.display());

    let backend = FileShowBackend::open(&config.data_dir)?;

    match cli.command {
        Command::Migrate => {
            let report = calchart_migrator()?.migrate_backend(&backend)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::List => {
            for record in backend.list()? {
                println!("{}", serde_json::to_string(&record)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        #[cfg(feature = "http")]
        Command::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.bind_addr.clone());
            let store = calchart_store::ShowDocumentStore::new(
                backend,
                config.membership_directory()?,
                calchart_migrator()?,
            )
            .with_policy(config.policy());
            let service = std::sync::Arc::new(calchart_store::actions::ActionService::new(store));

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(calchart_store::actions::serve(service, &addr))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
