//! CLI argument parsing
//!
//! Uses clap for argument parsing with derive macros. Flags given on the
//! command line override the config file.

use crate::config::ShelfdashConfig;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Terminal dashboard for managing a book collection over its REST API
#[derive(Parser, Debug)]
#[command(name = "shelfdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Origin serving /api/books (overrides [api].base_url)
    #[arg(short, long, env = "SHELFDASH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/shelfdash/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Tick rate in ticks per second (drives overlay timers)
    #[arg(short = 't', long, default_value_t = 10.0, value_parser = parse_rate, global = true)]
    pub tick_rate: f64,

    /// Frame rate in frames per second (default: 30.0)
    #[arg(short = 'F', long, default_value_t = 30.0, value_parser = parse_rate, global = true)]
    pub frame_rate: f64,

    /// Use an in-memory sample library instead of the API
    #[arg(long, default_value_t = false)]
    pub demo: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print an example config file
    Config {
        /// Write the defaults to the config path instead of printing
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

impl Cli {
    /// Config file path in effect
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(ShelfdashConfig::default_path)
    }

    /// Load the config file and layer command-line overrides on top
    pub fn load_config(&self) -> ShelfdashConfig {
        let mut config = ShelfdashConfig::load_from_path(self.config_path());
        self.apply_overrides(&mut config);
        config
    }

    fn apply_overrides(&self, config: &mut ShelfdashConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
    }
}

/// Highest accepted tick or frame rate
const MAX_RATE: f64 = 1000.0;

/// Parse a per-second rate; zero, negative and non-finite values are rejected
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if rate.is_finite() && rate > 0.0 && rate <= MAX_RATE {
        Ok(rate)
    } else {
        Err(format!("must be greater than 0 and at most {MAX_RATE}"))
    }
}

/// Generate shell completions and print to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "shelfdash", &mut io::stdout());
}
