//! Sequence Verifier - Command line entry point
//!
//! Reads a verification request (JSON file, stdin, or flags), verifies it
//! against the robot rule base or a rule file, and prints the JSON report
//! on stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use geo::Point;
use sequence_verifier::core::types::Position;
use sequence_verifier::oracle::{load_rule_base, RuleBase};
use sequence_verifier::verification::parse_action_list;
use sequence_verifier::{Result, VerificationInput, VerificationService, VerifierConfig};

/// Sequence Verifier - replay robot action sequences against a rule base
#[derive(Parser, Debug)]
#[command(name = "sequence-verifier")]
#[command(about = "Verify an action sequence and print a JSON report")]
struct Args {
    /// JSON request file ("-" reads stdin)
    #[arg(long, short = 'r', conflicts_with = "actions")]
    request: Option<PathBuf>,

    /// Comma-separated actions, e.g. "poweron,scanarea,pickobject"
    #[arg(long, short = 'a')]
    actions: Option<String>,

    /// Manual pickup target as X,Y (repeatable)
    #[arg(long = "target", short = 't', value_parser = parse_target)]
    targets: Vec<Position>,

    /// Disable movement insertion before pickups
    #[arg(long)]
    no_expand: bool,

    /// Rule base TOML (defaults to the built-in robot rules)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Verifier configuration TOML
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Verify the requested sequence; returns whether it was valid
fn run(args: &Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => VerifierConfig::load(path)?,
        None => VerifierConfig::default(),
    };
    let rules = match &args.rules {
        Some(path) => load_rule_base(path)?,
        None => RuleBase::robot_defaults(),
    };
    let input = build_input(args)?;

    let service = VerificationService::with_rules(rules, config);
    let report = service.verify_blocking(input)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(report.is_valid())
}

fn build_input(args: &Args) -> Result<VerificationInput> {
    let mut input = match (&args.request, &args.actions) {
        (Some(path), _) => {
            let body = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path)?
            };
            VerificationInput::from_json_str(&body)?
        }
        (None, Some(list)) => VerificationInput::new(parse_action_list(list)),
        (None, None) => {
            return Err(sequence_verifier::VerifierError::InvalidFormat(
                "Provide --request or --actions".into(),
            ))
        }
    };

    if !args.targets.is_empty() {
        input.targets = args.targets.clone();
    }
    if args.no_expand {
        input.auto_expand = false;
    }
    Ok(input)
}

fn parse_target(raw: &str) -> std::result::Result<Position, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", raw))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad X in '{}': {}", raw, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad Y in '{}': {}", raw, e))?;
    Ok(Point::new(x, y))
}
