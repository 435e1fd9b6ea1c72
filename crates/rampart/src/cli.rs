use clap::{Parser, Subcommand};

use rampart_core::TIMEOUT_SECONDS;

#[derive(Parser, Debug)]
#[command(
    name = "rampart",
    version,
    about = "Dependency risk analyser and SBOM generator",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a manifest and print the risk report as JSON
    #[command(after_help = "EXAMPLES:
  # Analyse a package.json
  rampart analyze -e npm -m package.json

  # Pipe a requirements.txt through stdin
  cat requirements.txt | rampart analyze -e pypi

  # Fresh run, ignoring the result cache
  rampart analyze -e cargo -m Cargo.toml --no-cache")]
    Analyze {
        /// Ecosystem the manifest belongs to (npm|pypi|go|maven|cargo)
        #[arg(long, short = 'e')]
        ecosystem: String,
        /// Manifest file to analyse; `-` reads stdin
        #[arg(long, short = 'm', default_value = "-")]
        manifest: String,
        /// Result cache directory (defaults to $RAMPART_CACHE_DIR or
        /// the platform cache dir)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<String>,
        /// Skip the result cache entirely
        #[arg(long)]
        no_cache: bool,
        /// Wall-clock budget in seconds
        #[arg(long, default_value_t = TIMEOUT_SECONDS)]
        timeout: u64,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Emit a CycloneDX 1.5 SBOM from a prior analysis document
    Sbom {
        /// Analysis JSON with nodes and ecosystem; `-` reads stdin
        #[arg(long, short = 'i', default_value = "-")]
        input: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}
