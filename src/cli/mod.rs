pub mod ipwhois;
pub mod lookup;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::client::{Response, SnusbaseClient};
use crate::config::{self, ApiKey, Config};
use crate::format;
use crate::output::OutputFormat;

pub const BASE_URL_ENV: &str = "SNUSBASE_BASE_URL";

#[derive(Parser)]
#[command(name = "snusbase")]
#[command(about = "Query the Snusbase API for leaked credentials, hashes and IP WHOIS data")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// API key (or SNUSBASE_API_KEY env var, .env file, config file)
    #[arg(long, global = true, env = "SNUSBASE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "SNUSBASE_BASE_URL", hide = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Environment file loaded before resolving the API key
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Config file (default: ./.snusbase.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for leaked data
    Search(lookup::LookupArgs),
    /// Hash/password lookup
    Hash(lookup::LookupArgs),
    /// IP WHOIS lookup
    Ipwhois(ipwhois::IpWhoisArgs),
    /// Get database statistics
    Stats,
}

/// Everything a command needs once setup has succeeded.
pub struct Session {
    pub client: SnusbaseClient,
    pub config: Config,
    pub format: OutputFormat,
}

impl Session {
    /// Loads the env file and config, then resolves the API key. Fails before
    /// any request is made when no key is available.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        config::load_env_file(&global.env_file)?;

        let config = match &global.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let api_key = ApiKey::resolve(global.api_key.as_deref(), &config)?;

        let base_url = global
            .base_url
            .clone()
            .or_else(|| std::env::var(BASE_URL_ENV).ok());
        let options = config.client_options(base_url.as_deref(), global.timeout);

        let client = SnusbaseClient::new(api_key, options).context("Failed to create API client")?;

        let format = global
            .format
            .or_else(|| OutputFormat::from_config(config.defaults.format.as_deref()))
            .unwrap_or_default();

        Ok(Self {
            client,
            config,
            format,
        })
    }

    pub fn print(&self, response: &Response) -> Result<()> {
        let text = match self.format {
            OutputFormat::Plain => format::format_results(response),
            OutputFormat::Table => format::format_table(response),
            OutputFormat::Json => format::format_json(response)?,
        };
        println!("{}", text);
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let session = Session::open(&cli.global)?;

    match cli.command {
        Commands::Search(args) => lookup::run_search(&session, args),
        Commands::Hash(args) => lookup::run_hash(&session, args),
        Commands::Ipwhois(args) => ipwhois::run(&session, args),
        Commands::Stats => stats::run(&session),
    }
}
