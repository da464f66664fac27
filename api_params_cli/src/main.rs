//! # api-params CLI
//!
//! Runs one sample action against `key=value` parameters and prints the
//! typed result, or the structured error the request would be rejected with.

mod actions;
mod fixtures;

use actions::Action;
use api_params::config::{LoggingPreferences, RuntimeConfig};
use api_params::logging::{self, codes, service, LogBridge, LoggingService};
use api_params::{log_info, log_success, ErrorKind, ParseContext, ParseEnv, ParseError, RequestParams};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "api-params", version, about = "Parse API request parameters")]
struct Args {
    /// Action whose parameters are parsed
    #[arg(short, long, value_enum, default_value = "observations")]
    action: Action,

    /// TOML runtime configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON entity fixtures; a small built-in set is used otherwise
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Acting user, by id or login
    #[arg(short, long)]
    user: Option<String>,

    /// Print errors and help as JSON
    #[arg(long)]
    json: bool,

    /// Request parameters as key=value
    #[arg(value_parser = parse_pair)]
    params: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => {
            let config = RuntimeConfig::default();
            config.validate()?;
            config
        }
    };

    log::debug!("Runtime configuration: {:?}", config);

    logging::init_global_logging_with_service(Arc::new(logging_service(&config.logging)))?;
    log_success!(
        codes::success::CONFIGURATION_LOADED,
        "Configuration loaded",
        "source" => args.config.as_ref().map_or("defaults".to_string(), |p| p.display().to_string())
    );

    let store = match &args.fixtures {
        Some(path) => fixtures::load_store(path)?,
        None => fixtures::demo_store(),
    };
    let actor = match &args.user {
        Some(user) => Some(
            fixtures::resolve_actor(&store, user)
                .ok_or_else(|| format!("Unknown user '{}'", user))?,
        ),
        None => None,
    };

    let params: RequestParams = args.params.iter().cloned().collect();
    let mut env = ParseEnv::new(&store, &config.parser);
    if let Some(actor) = &actor {
        env = env.with_actor(actor);
    }
    let mut ctx =
        ParseContext::new(&params, env).log_declarations(config.logging.log_declarations);

    log_info!("Parsing request", "action" => args.action.as_str(), "params" => params.len());
    let outcome = actions::run(args.action, &mut ctx);
    let outcome = ctx.finish(outcome);

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if matches!(err.kind, ErrorKind::HelpMessage { .. }) => {
            print_help(args, &ctx, &err)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report(args, &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Console loggers when the configuration turns them on, otherwise events
/// go through `env_logger` like the rest of the binary's output.
fn logging_service(prefs: &LoggingPreferences) -> LoggingService {
    if prefs.enable_console_logging {
        service::create_configured_service(prefs)
    } else {
        LoggingService::new(Arc::new(LogBridge), prefs.min_log_level)
    }
}

fn print_help(
    args: &Args,
    ctx: &ParseContext<'_>,
    err: &ParseError,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", ctx.registry().to_json()?);
        return Ok(());
    }
    if let ErrorKind::HelpMessage { declarations } = &err.kind {
        println!("{} parameters:", args.action.as_str());
        for declaration in declarations {
            println!("    {}", declaration.usage());
        }
    }
    Ok(())
}

fn report(args: &Args, err: &ParseError) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&err.report())?);
    } else {
        eprintln!("Error [{}]: {}", err.kind.error_code().as_str(), err);
    }
    Ok(())
}
