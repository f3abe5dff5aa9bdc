//! Affiliate deep-link toolkit CLI
//!
//! Local execution entry point. Credentials are read from
//! `COUPANG_ACCESS_KEY` / `COUPANG_SECRET_KEY`.

use std::path::PathBuf;

use affiliate_linker::{
    config,
    error::{AppError, Result},
    models::{Credentials, SearchQuery, SortOrder},
    pipeline::{self, ResolveOptions},
    services::{DeepLinkResolver, ProductSearchClient},
    storage::{self, LocalStorage},
};
use chrono::Utc;
use clap::{Parser, Subcommand};

/// affiliate-linker - Partner deep-link and keyword toolkit
#[derive(Parser, Debug)]
#[command(
    name = "affiliate-linker",
    version,
    about = "Affiliate deep-link resolver, product search and keyword ranking"
)]
struct Cli {
    /// Directory holding config and CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Path to config file (default: {data_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert product URLs into affiliate short-links
    Deeplink {
        /// Product URLs to convert
        #[arg(required = true)]
        urls: Vec<String>,

        /// subId to attach (overrides config)
        #[arg(long)]
        sub_id: Option<String>,

        /// channelId to attach (overrides config)
        #[arg(long)]
        channel_id: Option<String>,

        /// Never fail; print the original URL for anything unresolved
        #[arg(long)]
        tolerant: bool,
    },

    /// Attach deep-links to every row of the product seed file
    Seed {
        /// Seed file inside the data directory
        #[arg(long, default_value = storage::PRODUCTS_SEED)]
        input: String,

        /// Output file inside the data directory
        #[arg(long, default_value = storage::PRODUCTS_SEED_RESOLVED)]
        output: String,
    },

    /// Search partner products by keyword
    Search {
        keyword: String,

        /// Number of products (1-50)
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// accuracy, salesVolume, keywordRank, priceAsc, priceDesc or latest
        #[arg(long)]
        sort: Option<SortOrder>,

        #[arg(long)]
        min_price: Option<u64>,

        #[arg(long)]
        max_price: Option<u64>,

        /// Rocket delivery only
        #[arg(long)]
        rocket_only: bool,

        /// Append results as seed rows to this file inside the data directory
        #[arg(long)]
        output: Option<String>,
    },

    /// Rank harvested keywords into the keyword CSV lists
    Classify {
        /// Keyword line file inside the data directory (overrides config)
        #[arg(long)]
        input: Option<String>,
    },

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("config.toml"));
    let mut config = config::load_config(&config_path);
    log::debug!("Loaded configuration from {}", config_path.display());

    let storage = LocalStorage::new(&cli.data_dir);

    match cli.command {
        Command::Deeplink {
            urls,
            sub_id,
            channel_id,
            tolerant,
        } => {
            let mut options = ResolveOptions::from_config(&config.partner, Utc::now());
            if sub_id.is_some() {
                options.sub_id = sub_id;
            }
            if channel_id.is_some() {
                options.channel_id = channel_id;
            }

            if tolerant {
                let credentials = config::credentials_from_env().unwrap_or_else(|e| {
                    log::warn!("{e}; links will be left unchanged");
                    Credentials::default()
                });
                let resolver = config
                    .validate()
                    .and_then(|()| DeepLinkResolver::new(credentials, &config.partner));
                match resolver {
                    Ok(resolver) => {
                        for url in &urls {
                            println!("{}", resolver.resolve_one(url, &options).await);
                        }
                    }
                    Err(e) => {
                        log::warn!("Deep-link setup failed: {e}; links will be left unchanged");
                        for url in &urls {
                            println!("{url}");
                        }
                    }
                }
            } else {
                config.validate()?;
                let resolver = DeepLinkResolver::new(config::credentials_from_env()?, &config.partner)?;
                let links = resolver.resolve_many(&urls, &options).await?;
                println!("{}", serde_json::to_string_pretty(&links)?);
            }
        }

        Command::Seed { input, output } => {
            config.validate()?;
            let resolver = DeepLinkResolver::new(config::credentials_from_env()?, &config.partner)?;
            let options = ResolveOptions::from_config(&config.partner, Utc::now());
            let summary = pipeline::run_seed(&resolver, &storage, &options, &input, &output).await?;
            log::info!(
                "Seed complete: {} row(s), {} URL(s) submitted, {} resolved",
                summary.rows,
                summary.submitted,
                summary.resolved
            );
        }

        Command::Search {
            keyword,
            limit,
            sort,
            min_price,
            max_price,
            rocket_only,
            output,
        } => {
            config.validate()?;
            let client = ProductSearchClient::new(config::credentials_from_env()?, &config.partner)?;
            let query = SearchQuery {
                sort,
                min_price,
                max_price,
                rocket_only: rocket_only.then_some(true),
                ..SearchQuery::new(keyword).limit(limit)
            };
            let products = pipeline::run_search(&client, &storage, &query, output.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&products)?);
        }

        Command::Classify { input } => {
            if let Some(input) = input {
                config.keywords.input_file = input;
            }
            config.validate()?;
            match pipeline::prepare_keyword_lines(&config.keywords, &storage).await? {
                Some(selection) => log::info!(
                    "Wrote {} general, {} golden and {} golden shopping keyword(s)",
                    selection.general.len(),
                    selection.golden.len(),
                    selection.golden_shopping.len()
                ),
                None => log::info!("Nothing to classify"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match config::credentials_from_env() {
                Ok(credentials) => {
                    log::info!("✓ Credentials present (access key {})", credentials.access_key())
                }
                Err(AppError::MissingCredentials) => {
                    log::error!("Credentials missing");
                    return Err(AppError::MissingCredentials);
                }
                Err(e) => return Err(e),
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
