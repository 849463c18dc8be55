use clap::Parser;
use photostyle::catalog::Catalog;
use photostyle::config::{AppConfig, setup_logging};
use photostyle::genai::gemini::GeminiClient;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = photostyle::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return;
        }
    };

    let catalog = match Catalog::build(config.catalog_size, config.catalog_seed) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Failed to build filter catalog: {}", err);
            return;
        }
    };
    info!("Catalog seed {}", config.catalog_seed);

    let backend = GeminiClient::new(config.gemini.clone());

    if let Err(err) = photostyle::web::setup_server(&config, catalog, backend).await {
        error!("Application error: {}", err);
    }
}
