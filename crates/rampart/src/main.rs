use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rampart::cli::{Cli, Commands};
use rampart::{error_envelope, generate_sbom, Analyzer, AnalyzeRequest, SbomRequest};
use rampart_advisories::{KevFeed, OsvClient};
use rampart_cache::{DiskCache, NoCache, ResultCache};
use rampart_core::AnalysisError;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let (status, body) = error_envelope(&err);
            eprintln!("{body}");
            if status == 400 {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<String, AnalysisError> {
    match cli.command {
        Commands::Analyze {
            ecosystem,
            manifest,
            cache_dir,
            no_cache,
            timeout,
            pretty,
        } => {
            let manifest = read_input(&manifest)?;

            let cache: Box<dyn ResultCache> = if no_cache {
                Box::new(NoCache)
            } else {
                let dir = cache_dir.map(PathBuf::from).unwrap_or_else(DiskCache::default_dir);
                Box::new(DiskCache::new(dir))
            };
            let advisories = OsvClient::new();
            let exploit_feed = KevFeed::new();
            let mut analyzer = Analyzer::new(&advisories, &exploit_feed, cache.as_ref());
            analyzer.timeout = Duration::from_secs(timeout);

            let body = analyzer.analyze(&AnalyzeRequest { manifest, ecosystem })?;
            render(body, pretty)
        }
        Commands::Sbom { input, pretty } => {
            let document = read_input(&input)?;
            let request: SbomRequest = serde_json::from_str(&document).map_err(|err| {
                AnalysisError::Client(format!("invalid analysis document: {err}"))
            })?;
            let body = generate_sbom(&request)?;
            render(body, pretty)
        }
    }
}

/// Read a file argument, with `-` standing for stdin.
fn read_input(source: &str) -> Result<String, AnalysisError> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| AnalysisError::Client(format!("could not read stdin: {err}")))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
            .map_err(|err| AnalysisError::Client(format!("could not read {source}: {err}")))
    }
}

fn render(body: String, pretty: bool) -> Result<String, AnalysisError> {
    if !pretty {
        return Ok(body);
    }
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|err| AnalysisError::Internal(err.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|err| AnalysisError::Internal(err.to_string()))
}
