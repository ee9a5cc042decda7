//! CASHTREND: cash-inflow trend loan eligibility assessor
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the transaction store from disk, and either scores a single
//! request or serves the HTTP API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use cashtrend::api::{self, ApiState};
use cashtrend::config::AppConfig;
use cashtrend::report;
use cashtrend::scoring::EligibilityScorer;
use cashtrend::service::EligibilityService;
use cashtrend::store::InMemoryStore;
use cashtrend::types::LoanRequest;

#[derive(Parser, Debug)]
#[command(name = "cashtrend", version, about = "Loan eligibility from cash-inflow trends")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Override the transaction file from the configuration
    #[arg(long)]
    transactions: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a single loan request
    Assess {
        /// Customer ID (e.g. "user 1")
        #[arg(long)]
        customer: String,

        /// Requested loan amount
        #[arg(long)]
        amount: f64,

        /// Print the assessment as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List customers in the transaction store
    Customers,
    /// Serve the HTTP API
    Serve {
        /// Port to bind to (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(&cli.config)?;

    init_logging();

    let tx_path = cli.transactions.as_deref().unwrap_or(&cfg.store.path);
    let store = InMemoryStore::load_json(tx_path)?;
    let scorer = EligibilityScorer::from_config(&cfg.scoring, &cfg.display.currency);
    info!(
        classifier = scorer.classifier_name(),
        customers = store.len(),
        currency = %cfg.display.currency,
        "CASHTREND ready"
    );
    let service = EligibilityService::new(Arc::new(store), scorer);

    match cli.command {
        Command::Assess {
            customer,
            amount,
            json,
        } => {
            let assessment = service.assess(&LoanRequest::new(customer, amount)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print!("{}", report::render_text(&assessment, &cfg.display.currency));
            }
        }
        Command::Customers => {
            for customer in service.customers().await? {
                println!("{customer}");
            }
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(cfg.server.port);
            let addr: SocketAddr = format!("{}:{port}", cfg.server.host)
                .parse()
                .with_context(|| format!("Invalid server address {}:{port}", cfg.server.host))?;
            let state = Arc::new(ApiState::new(service, cfg.display.currency.clone()));
            api::serve(state, addr).await?;
        }
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cashtrend=info"));

    let json_logging = std::env::var("CASHTREND_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
