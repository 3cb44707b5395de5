use anyhow::Result;
use clap::Parser;
use semitia::{
    commands,
    config::{Config, Overrides},
    dataset::DEFAULT_EXPORT_NAME,
    http::ReqwestTransport,
    runtime::RealRuntime,
    stats::StatsRange,
};
use std::path::PathBuf;
use std::time::Duration;

/// semitia - IHRA classification dashboard
///
/// Browse pre-classified CSV files, classify single texts against a remote
/// IHRA classifier, and chart aggregate statistics.
///
/// The service is located through API_BASE (tries <base>/api/classify, then
/// <base>/classify) and/or API_ENDPOINT (tried first). API_TOKEN, when set,
/// is sent as a bearer token.
///
/// Examples:
///   semitia csv tuits.csv --label 2
///   semitia classify "texto a clasificar"
///   semitia stats --range 7d
#[derive(Parser, Debug)]
#[command(author, version = env!("SEMITIA_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the classification service (overrides API_BASE)
    #[arg(long = "api-base", value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Full classify endpoint, tried before the base URL paths (overrides API_ENDPOINT)
    #[arg(long = "api-endpoint", value_name = "URL", global = true)]
    pub api_endpoint: Option<String>,

    /// Bearer token (overrides API_TOKEN)
    #[arg(long = "api-token", value_name = "TOKEN", global = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds (also via SEMITIA_TIMEOUT)
    #[arg(
        long = "timeout",
        env = "SEMITIA_TIMEOUT",
        value_name = "SECONDS",
        global = true
    )]
    pub timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Browse a CSV of classified texts
    Csv(CsvArgs),

    /// Classify a single text with the remote service
    Classify(ClassifyArgs),

    /// Chart aggregate statistics from the remote service
    Stats(StatsArgs),

    /// Show the endpoints that would be used
    Endpoints,

    /// Interactive session switching between the three views
    Dashboard,
}

#[derive(clap::Args, Debug)]
pub struct CsvArgs {
    /// CSV with columns texto, etiqueta_gpt, subtipo_gpt, confidence_gpt, reason_gpt
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only list texts with this label (defaults to the first label)
    #[arg(long, short = 'l', value_name = "LABEL")]
    pub label: Option<String>,

    /// Re-export the table, to semitia_clasificado.csv when no path is given
    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXPORT_NAME
    )]
    pub export: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// A tweet or short text in Spanish
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Time window
    #[arg(long, short = 'r', value_enum, default_value_t = StatsRange::Month)]
    pub range: StatsRange,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let overrides = Overrides {
        base_url: cli.api_base,
        explicit_endpoint: cli.api_endpoint,
        auth_token: cli.api_token,
        timeout: cli.timeout.map(Duration::from_secs),
    };
    let config = Config::load(&runtime, overrides)?;
    let transport = ReqwestTransport::with_defaults()?;
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Csv(args) => commands::csv(
            &runtime,
            &args.file,
            args.label.as_deref(),
            args.export.as_deref(),
            &mut stdout,
        )?,
        Commands::Classify(args) => {
            commands::classify(&transport, &config, &args.text, &mut stdout).await?
        }
        Commands::Stats(args) => {
            commands::stats(&transport, &config, args.range, &mut stdout).await?
        }
        Commands::Endpoints => commands::endpoints(&config, &mut stdout)?,
        Commands::Dashboard => {
            commands::dashboard(&runtime, &transport, &config, &mut stdout).await?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_classify_parsing() {
        let cli = Cli::try_parse_from(["semitia", "classify", "hola mundo"]).unwrap();
        match cli.command {
            Commands::Classify(args) => assert_eq!(args.text, "hola mundo"),
            _ => panic!("Expected Classify command"),
        }
        assert_eq!(cli.api_base, None);
    }

    #[test]
    fn test_cli_csv_parsing() {
        let cli = Cli::try_parse_from([
            "semitia", "csv", "tuits.csv", "--label", "2", "-o", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Csv(args) => {
                assert_eq!(args.file, PathBuf::from("tuits.csv"));
                assert_eq!(args.label.as_deref(), Some("2"));
                assert_eq!(args.export, Some(PathBuf::from("out.csv")));
            }
            _ => panic!("Expected Csv command"),
        }
    }

    #[test]
    fn test_cli_csv_bare_export_uses_default_name() {
        let cli = Cli::try_parse_from(["semitia", "csv", "tuits.csv", "--export"]).unwrap();
        match cli.command {
            Commands::Csv(args) => {
                assert_eq!(args.export, Some(PathBuf::from(DEFAULT_EXPORT_NAME)));
            }
            _ => panic!("Expected Csv command"),
        }

        let cli = Cli::try_parse_from(["semitia", "csv", "tuits.csv"]).unwrap();
        match cli.command {
            Commands::Csv(args) => assert_eq!(args.export, None),
            _ => panic!("Expected Csv command"),
        }
    }

    #[test]
    fn test_cli_stats_range_default_and_explicit() {
        let cli = Cli::try_parse_from(["semitia", "stats"]).unwrap();
        match cli.command {
            Commands::Stats(args) => assert_eq!(args.range, StatsRange::Month),
            _ => panic!("Expected Stats command"),
        }

        let cli = Cli::try_parse_from(["semitia", "stats", "--range", "90d"]).unwrap();
        match cli.command {
            Commands::Stats(args) => assert_eq!(args.range, StatsRange::Quarter),
            _ => panic!("Expected Stats command"),
        }

        assert!(Cli::try_parse_from(["semitia", "stats", "--range", "1y"]).is_err());
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "semitia",
            "--api-base",
            "https://x.test",
            "endpoints",
            "--api-token",
            "abc",
        ])
        .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("https://x.test"));
        assert_eq!(cli.api_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["semitia"]).is_err());
    }
}
