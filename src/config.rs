use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scrape-service", about = "Job posting scraper and ingestion service")]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value_t = true, action = clap::ArgAction::Set)]
    pub run_migrations: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value_t = false, action = clap::ArgAction::Set)]
    pub log_json: bool,

    #[command(flatten)]
    pub scraper: ScraperArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings for the LinkedIn guest search scraper.
#[derive(clap::Args, Debug, Clone)]
pub struct ScraperArgs {
    /// Search keywords
    #[arg(long, env = "SCRAPE_KEYWORDS", default_value = "software engineer")]
    pub keywords: String,

    /// Search location
    #[arg(long, env = "SCRAPE_LOCATION", default_value = "United States")]
    pub location: String,

    /// Maximum number of result pages to walk per scrape
    #[arg(long, env = "SCRAPE_MAX_PAGES", default_value_t = 4)]
    pub max_pages: u32,

    /// HTTP request timeout in seconds
    #[arg(long = "request-timeout", env = "SCRAPE_TIMEOUT_SECS", default_value_t = 20)]
    pub request_timeout_secs: u64,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Scrape once, store new postings and exit
    Ingest,
    /// Fetch and store the description of one job
    Describe {
        #[arg(long)]
        job_id: i32,
    },
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}
