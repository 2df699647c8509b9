//! Command-line interface parsing for the listing proxy
//!
//! Flags given on the command line take precedence over the environment.

use clap::Parser;

use crate::config::Config;

/// Serve a cached, filterable listing of a Webflow collection
#[derive(Parser, Debug)]
#[command(name = "listing-proxy")]
#[command(about = "Serve a cached, filterable listing of a Webflow collection")]
#[command(version)]
pub struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Snapshot time-to-live in seconds (overrides CACHE_TTL_SECONDS)
    #[arg(long, value_name = "SECONDS")]
    pub ttl: Option<u32>,

    /// Fetch the collection once before accepting requests
    #[arg(long)]
    pub warm: bool,
}

impl Cli {
    /// Applies command-line overrides on top of `config`
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ttl) = self.ttl {
            config.cache_ttl_secs = ttl;
        }
        config
    }
}
