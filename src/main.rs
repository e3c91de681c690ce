use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use consultlog::{
    AppState, EnrichmentPipeline, GeminiConfig, GeminiReformatter, MlServiceClient, RiskAnalyzer,
    SentimentAnalyzer, ServiceConfig, SqliteRecordStore, TextAnalyzer, build_router,
    read_conversation_file, render_dialogue, write_reformatted,
};

#[derive(Parser)]
#[command(name = "consultlog")]
#[command(author, version, about = "Consultation transcript records with ML enrichment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP record service
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database URL (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Insert speaker markers into a raw conversation file
    Reformat {
        /// Input conversation file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the reformatted transcript (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            database_url,
            verbose,
        } => {
            setup_logging(verbose);
            serve(port, database_url).await
        }
        Commands::Reformat {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            reformat(input, output).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Load configuration, letting explicit flags win over the environment
fn load_config(port: Option<u16>, database_url: Option<String>) -> Result<ServiceConfig> {
    consultlog::config::load_dotenv();
    ServiceConfig::from_lookup(|key| match (key, &database_url) {
        ("DATABASE_URL", Some(url)) => Some(url.clone()),
        _ => std::env::var(key).ok(),
    })
    .map(|mut config| {
        if let Some(port) = port {
            config.port = port;
        }
        config
    })
}

async fn serve(port: Option<u16>, database_url: Option<String>) -> Result<()> {
    let config = load_config(port, database_url)?;
    info!("Using ML API URL: {}", config.ml_api_url);

    info!("Connecting to database...");
    let store = SqliteRecordStore::connect(&config.database_url).await?;
    info!("Successfully connected to the database");

    let ml_service = MlServiceClient::new(config.ml_api_url.clone());
    let pipeline = EnrichmentPipeline::new(
        Arc::new(RiskAnalyzer::new(ml_service.clone(), config.retry)),
        Arc::new(SentimentAnalyzer::new(ml_service, config.retry)),
        Arc::new(store),
    );
    let reformatter = Arc::new(GeminiReformatter::new(config.gemini.clone()));

    let app = build_router(AppState::new(pipeline, reformatter));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Server starting on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn reformat(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    consultlog::config::load_dotenv();
    let config = GeminiConfig::from_env()?;

    info!("Loading conversation from {:?}", input);
    let conversation = read_conversation_file(&input)?;

    let reformatter = GeminiReformatter::new(config);
    let reformatted = reformatter
        .analyze(&conversation)
        .await
        .context("Reformatting failed")?;

    if let Some(path) = output {
        write_reformatted(&reformatted, &path)?;
        info!("Output written to {:?}", path);
    }

    print!(
        "{}",
        render_dialogue(&reformatted.updated_text, reformatted.start_with_doctor)
    );

    Ok(())
}
