use clap::Parser;
use perdiem_docgen::adapters::files::GraphDriveClient;
use perdiem_docgen::adapters::identity::IdentityClient;
use perdiem_docgen::adapters::payhawk::PayhawkClient;
use perdiem_docgen::config::{AppConfig, Cli};
use perdiem_docgen::utils::{logger, validation::Validate};
use perdiem_docgen::{DocumentGenerator, FieldExtractor};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose);
    tracing::info!("Starting perdiem-docgen");

    let config = AppConfig::from_file(&cli.config)?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let payhawk = PayhawkClient::new(&config.payhawk);
    let identity = IdentityClient::new(&config.identity);
    let store = GraphDriveClient::new(&config.files, identity);
    let extractor = FieldExtractor::new(config.custom_fields.clone());
    let generator = Arc::new(DocumentGenerator::new(
        payhawk,
        store,
        extractor,
        config.generation.regenerate_if_exists,
    ));

    let app = perdiem_docgen::server::router(generator);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("✅ Listening on {}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
