//! Scooter Shop CLI - Operator tools for the storefront data store.
//!
//! # Usage
//!
//! ```bash
//! # Write the built-in users and catalog into an empty store
//! ss-cli seed
//!
//! # Accounts
//! ss-cli register -n "Jo" -e jo@gmail.com
//! ss-cli login -e jo@gmail.com
//! ss-cli whoami
//! ss-cli logout
//!
//! # Reward points
//! ss-cli points add -e jo@gmail.com 150
//! ss-cli points get -e jo@gmail.com
//!
//! # Catalog
//! ss-cli products list
//! ss-cli products add --prefix BMS -n "Controlador 48V" --price 45990
//!
//! # Preview the navbar/footer bindings for a page
//! ss-cli layout render --page productos.html
//! ```
//!
//! Passwords are read from stdin when `--password` is not given.
//!
//! # Environment Variables
//!
//! See `scooter_shop_storefront::config`. `RUST_LOG` overrides the default
//! log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scooter_shop_core::Price;
use scooter_shop_storefront::config::StorefrontConfig;
use scooter_shop_storefront::services::NewProduct;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(author, version, about = "Scooter Shop CLI tools")]
struct Cli {
    /// Store directory (overrides `STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write built-in users and products if the store has none
    Seed,
    /// Register a new user
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and store the session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Reward points
    Points {
        #[command(subcommand)]
        action: PointsAction,
    },
    /// Product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Layout preview
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Subcommand)]
enum PointsAction {
    /// Show a user's points and tier
    Get {
        #[arg(short, long)]
        email: String,
    },
    /// Add (or with a negative number, remove) points
    Add {
        #[arg(short, long)]
        email: String,

        /// Points to add
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List the catalog
    List,
    /// Add a product with a generated id and code
    Add {
        /// Code prefix, e.g. BMS
        #[arg(long)]
        prefix: String,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Price in whole pesos
        #[arg(long)]
        price: u64,

        #[arg(long, default_value_t = 0)]
        stock: u32,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        brand: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Image URL
        #[arg(long, default_value = "")]
        image: String,
    },
}

#[derive(Subcommand)]
enum LayoutAction {
    /// Load the fragments for a page and print the resulting bindings
    Render {
        /// Page file name or path
        #[arg(long, default_value = "index.html")]
        page: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scooter_shop_storefront=info,ss_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        if e.is_internal() {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Command failed");
        } else {
            tracing::error!("{}", e.user_message());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), CliError> {
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let shop = commands::open_storefront(config)?;

    match cli.command {
        Commands::Seed => commands::seed::run(&shop)?,
        Commands::Register {
            name,
            email,
            password,
        } => {
            let password = commands::read_password(password.map(SecretString::from))?;
            commands::account::register(&shop, &name, &email, &password)?;
        }
        Commands::Login { email, password } => {
            let password = commands::read_password(password.map(SecretString::from))?;
            commands::account::login(&shop, &email, &password)?;
        }
        Commands::Logout => commands::account::logout(&shop)?,
        Commands::Whoami => commands::account::whoami(&shop),
        Commands::Points { action } => match action {
            PointsAction::Get { email } => commands::points::get(&shop, &email),
            PointsAction::Add { email, delta } => commands::points::add(&shop, &email, delta)?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&shop),
            ProductsAction::Add {
                prefix,
                name,
                price,
                stock,
                category,
                brand,
                description,
                image,
            } => {
                let new = NewProduct {
                    prefix,
                    name,
                    price: Price::new(price),
                    stock,
                    category,
                    brand,
                    description,
                    image,
                };
                commands::products::add(&shop, new)?;
            }
        },
        Commands::Layout { action } => match action {
            LayoutAction::Render { page } => commands::layout::render(&shop, &page).await,
        },
    }
    Ok(())
}
