use clap::{Parser, Subcommand};
use product_admin::{
    assets::LocalAssetStore,
    config::{self, database},
    errors::{Error, Result},
    handlers::{Catalog, ProductStore, ProductUpdateCommand, ProductUpdateHandler},
    models::ProductPayload,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Product catalog administration
#[derive(Debug, Parser)]
#[command(name = "product-admin", about = "Product catalog administration", long_about = None)]
struct Cli {
    /// Settings file; missing files fall back to defaults
    #[arg(short, long, env = "PRODUCT_ADMIN_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing catalog tables
    InitDb,
    /// Print a product aggregate as JSON
    Show {
        /// Product ID
        product_id: i32,
    },
    /// Apply a full replacement payload (JSON file) to a stored product
    Update {
        /// Path to the payload
        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration(&cli.config)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Using database {} and web root {}",
        app_config.database_url,
        app_config.web_root.display()
    );

    // 4. Connect
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    let catalog = Catalog::new(db);

    match cli.command {
        Command::InitDb => {
            database::create_tables(catalog.database()).await?;
            info!("Catalog tables are in place.");
        }
        Command::Show { product_id } => {
            let graph = catalog
                .load(product_id)
                .await?
                .ok_or_else(|| Error::not_found("Product", product_id))?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        Command::Update { payload } => {
            let contents = tokio::fs::read_to_string(&payload).await?;
            let product: ProductPayload = serde_json::from_str(&contents)?;

            let handler = ProductUpdateHandler::new(
                catalog.clone(),
                catalog,
                LocalAssetStore::new(app_config.web_root),
            );
            let updated = handler
                .handle(ProductUpdateCommand::new(product))
                .await
                .inspect_err(|e| error!("Product update failed: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
    }

    Ok(())
}
