//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, test, health), and their argument structs.
//! Every `run` flag has an environment variable equivalent for container
//! deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

#[derive(Parser)]
#[command(
    name = "webhook-relay",
    version,
    about = "Relay chat-style webhooks to a downstream messaging API",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        webhook-relay validate               Check ./config.yml\n  \
        webhook-relay run                    Start with ./config.yml\n  \
        webhook-relay run -c services.yml    Start with a specific config\n  \
        webhook-relay test                   Send a test message to every webhook"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Run(Box<RunArgs>),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Send a test message to every configured webhook and exit
    Test(TestArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        webhook-relay run                               Use ./config.yml\n  \
        webhook-relay run -c services.yml -p 9000       Specific config and port\n  \
        DEBUG=true webhook-relay run --pretty           Local dev mode (reload on every request)")]
pub struct RunArgs {
    /// Config file path (.yml, .yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Development mode: reload the config on every request and log at debug level
    #[arg(long, env = "DEBUG", value_parser = parse_debug_flag)]
    pub debug: bool,

    // -- Logging --
    /// Log level (defaults to debug with --debug, info otherwise)
    #[arg(short, long, env = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Outbound request timeout in seconds (overrides global.timeout_seconds)
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help_heading = "Tuning"
    )]
    pub timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

/// `DEBUG` is on only for `true`, in any casing. Any other value is off.
#[allow(clippy::unnecessary_wraps)]
fn parse_debug_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

impl RunArgs {
    #[must_use]
    pub fn effective_log_level(&self) -> LogLevel {
        match (&self.log_level, self.debug) {
            (Some(level), _) => level.clone(),
            (None, true) => LogLevel::Debug,
            (None, false) => LogLevel::Info,
        }
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct TestArgs {
    /// Config file listing the webhooks to test
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => *args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_defaults() {
        let args = run_args(&["webhook-relay", "run", "-c", "services.yml"]);
        assert_eq!(args.config, PathBuf::from("services.yml"));
        assert_eq!(args.max_body, 1_048_576);
        assert_eq!(args.timeout, None);
    }

    #[test]
    fn debug_implies_debug_logging() {
        let args = run_args(&["webhook-relay", "run", "--debug"]);
        assert!(args.debug);
        assert_eq!(args.effective_log_level(), LogLevel::Debug);

        let args = run_args(&["webhook-relay", "run", "--debug", "-l", "warn"]);
        assert_eq!(args.effective_log_level(), LogLevel::Warn);
    }

    #[test]
    fn debug_env_accepts_any_value() {
        assert_eq!(parse_debug_flag("true"), Ok(true));
        assert_eq!(parse_debug_flag("True"), Ok(true));
        assert_eq!(parse_debug_flag("TRUE"), Ok(true));
        assert_eq!(parse_debug_flag("1"), Ok(false));
        assert_eq!(parse_debug_flag("yes"), Ok(false));
        assert_eq!(parse_debug_flag(""), Ok(false));

        // The only test in this binary that touches DEBUG
        for (value, expected) in [("True", true), ("1", false), ("false", false)] {
            std::env::set_var("DEBUG", value);
            let parsed = Cli::try_parse_from(["webhook-relay", "run"]);
            std::env::remove_var("DEBUG");
            match parsed.map(|cli| cli.command) {
                Ok(Some(Commands::Run(args))) => assert_eq!(args.debug, expected, "DEBUG={value}"),
                Ok(_) => panic!("expected run"),
                Err(e) => panic!("DEBUG={value} rejected: {e}"),
            }
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["webhook-relay", "run", "--timeout", "0"]).is_err());
        let args = run_args(&["webhook-relay", "run", "--timeout", "5"]);
        assert_eq!(args.timeout, Some(5));
    }

    #[test]
    fn pretty_and_json_conflict() {
        assert!(Cli::try_parse_from(["webhook-relay", "run", "--pretty", "--json"]).is_err());
    }
}
