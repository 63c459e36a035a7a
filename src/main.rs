use anyhow::{Context, Result};
use call_desk::{
    create_router, import_file, summarize_now, AppState, CallController, CallState, Config,
    HumeTokenIssuer, ResponseStore, SimulatedTransport, TokenIssuer,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "call-desk")]
#[command(about = "Call-centre assistant: phone lists, simulated calls, call records", long_about = None)]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/call-desk")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Parse a phone list and print the targets
    Import {
        /// CSV file: id,number,name,notes
        file: PathBuf,
    },
    /// Place one simulated call and store its record
    Call {
        /// CSV file: id,number,name,notes
        file: PathBuf,
        /// Index of the number to call
        #[arg(short, long, default_value = "0")]
        index: usize,
        /// Notes to save with the call
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Print dashboard metrics for the stored records
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cfg).await,
        Commands::Import { file } => {
            let targets = import_file(&file).await?;
            println!("{}", serde_json::to_string_pretty(&targets)?);
            Ok(())
        }
        Commands::Call { file, index, notes } => call_once(cfg, file, index, notes).await,
        Commands::Dashboard => {
            let store = ResponseStore::load(&cfg.storage.responses_path)?;
            let summary = summarize_now(store.records());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

fn build_controller(cfg: &Config) -> Result<CallController> {
    let store = ResponseStore::load(&cfg.storage.responses_path)
        .context("Failed to load call records")?;
    let transport = Arc::new(SimulatedTransport::new(cfg.voice.simulated_script.clone()));

    Ok(CallController::new(store, transport))
}

async fn serve(cfg: Config) -> Result<()> {
    let controller = build_controller(&cfg)?;

    let token_issuer: Option<Arc<dyn TokenIssuer>> = match HumeTokenIssuer::from_config(&cfg.voice)
    {
        Ok(issuer) => Some(Arc::new(issuer)),
        Err(e) => {
            warn!("Access tokens unavailable: {}", e);
            None
        }
    };

    let app = create_router(AppState::new(controller, token_issuer));

    let addr = cfg.http_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn call_once(cfg: Config, file: PathBuf, index: usize, notes: Option<String>) -> Result<()> {
    let mut controller = build_controller(&cfg)?;
    controller.load_targets(import_file(&file).await?)?;

    let target = controller.select(index)?.clone();
    info!("Calling {} ({})", target.number, target.id);

    if let Some(notes) = notes {
        controller.set_notes(notes);
    }

    if controller.start_call().await? != CallState::Connected {
        anyhow::bail!("Call to {} did not connect", target.number);
    }

    let record = controller.end_call().await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
