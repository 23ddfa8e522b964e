//! PayPal adapter CLI
//!
//! Drives the PayPal connection factory and payment provider from the
//! command line, the same way a host engine does per request.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod ui;

use commands::execute::ExecuteArgs;
use commands::prepare::PrepareArgs;
use commands::{ProductArgs, Settings};

#[derive(Parser, Debug)]
#[command(name = "paypal-cli")]
#[command(about = "PayPal adapter CLI - create and execute PayPal payments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    /// PayPal environment (sandbox or live)
    #[arg(long, global = true, env = "PAYPAL_MODE")]
    mode: Option<String>,

    /// Client id from the developer portal
    #[arg(long, global = true, env = "PAYPAL_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret from the developer portal
    #[arg(long, global = true, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// SDK log level (NONE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, global = true, env = "PAYPAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Override the PayPal API base URL
    #[arg(long, global = true, env = "PAYPAL_ENDPOINT", hide = true)]
    endpoint: Option<String>,

    /// Directory for the token cache and log file
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the connection settings form
    Form,

    /// Create a payment and print the approval URL
    Prepare {
        #[command(flatten)]
        product: ProductFlags,

        /// ISO currency code
        #[arg(long, default_value = "EUR")]
        currency: String,

        /// URL PayPal redirects to after approval
        #[arg(long, default_value = "https://localhost/paypal/return")]
        return_url: String,

        /// URL PayPal redirects to when the payer cancels
        #[arg(long, default_value = "https://localhost/paypal/cancel")]
        cancel_url: String,

        /// Local transaction id (random if omitted)
        #[arg(long)]
        transaction_id: Option<String>,
    },

    /// Execute a payment the payer approved
    Execute {
        #[command(flatten)]
        product: ProductFlags,

        /// PayPal payment id returned by prepare
        #[arg(long)]
        payment_id: String,

        /// PayerID from the return URL
        #[arg(long)]
        payer_id: String,

        /// `success` value from the return URL
        #[arg(long, default_value = "true")]
        success: String,

        /// Local transaction id (random if omitted)
        #[arg(long)]
        transaction_id: Option<String>,

        /// Do not require the success flag; let PayPal decide
        #[arg(long)]
        skip_success_check: bool,
    },
}

#[derive(Args, Debug)]
struct ProductFlags {
    /// Product id, sent as the item SKU
    #[arg(long)]
    sku: String,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 10 or 9.99
    #[arg(long)]
    price: String,
}

impl From<ProductFlags> for ProductArgs {
    fn from(flags: ProductFlags) -> Self {
        Self {
            sku: flags.sku,
            name: flags.name,
            price: flags.price,
        }
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        let cache_dir = self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("paypal-adapter")
        });

        Settings {
            mode: self.mode.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            log_level: self.log_level.clone(),
            endpoint: self.endpoint.clone(),
            cache_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("paypal_cli=debug,paypal_adapter=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("paypal_cli=info,paypal_adapter=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(err) = run(cli).await {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings();

    match cli.command {
        Commands::Form => commands::form::run(cli.json)?,
        Commands::Prepare {
            product,
            currency,
            return_url,
            cancel_url,
            transaction_id,
        } => {
            let args = PrepareArgs {
                product: product.into(),
                currency,
                return_url,
                cancel_url,
                transaction_id,
            };
            commands::prepare::run(&settings, args, cli.json).await?;
        }
        Commands::Execute {
            product,
            payment_id,
            payer_id,
            success,
            transaction_id,
            skip_success_check,
        } => {
            let args = ExecuteArgs {
                product: product.into(),
                payment_id,
                payer_id,
                success,
                transaction_id,
                skip_success_check,
            };
            commands::execute::run(&settings, args, cli.json).await?;
        }
    }

    Ok(())
}
