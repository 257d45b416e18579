//! Command-line front end for the alfred file tools.
//!
//! Usage:
//!   alfred tools
//!   alfred call search_for_file --args '{"fileName": "notes.txt"}'
//!   alfred find notes.txt --root ~ --mode file --first

use std::path::PathBuf;
use std::process::ExitCode;

use alfred::{load_config, AlfredConfig, CoreError, CoreResult, ToolContext, ToolRegistry};
use clap::{Parser, Subcommand, ValueEnum};
use filesystem::{SearchMode, SearchRequest};
use serde_json::{json, Value};

/// Find, read and edit files by name.
#[derive(Parser, Debug)]
#[command(name = "alfred")]
#[command(about = "Find, read and edit files by name")]
struct Args {
    /// JSON config file (falls back to $ALFRED_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available tools
    Tools,

    /// Run a tool with JSON arguments
    Call {
        /// Tool name, e.g. search_for_file
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Search a directory tree for an exact name
    Find {
        /// Name to look for
        name: String,

        /// Where to start; defaults to the configured search root
        #[arg(long)]
        root: Option<String>,

        #[arg(long, value_enum, default_value_t = ModeArg::Either)]
        mode: ModeArg,

        /// Stop at the first match
        #[arg(long)]
        first: bool,

        /// Directory scans kept in flight
        #[arg(long)]
        concurrency: Option<usize>,

        #[arg(long)]
        ignore_case: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    File,
    Folder,
    Either,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::File => SearchMode::File,
            ModeArg::Folder => SearchMode::Folder,
            ModeArg::Either => SearchMode::Either,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(payload) => {
            println!("{}", render(&payload));
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::debug!("command failed kind={}", error.kind());
            println!("{}", render(&error_payload(&error)));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn load(config_path: Option<PathBuf>) -> CoreResult<AlfredConfig> {
    let path = config_path.or_else(|| std::env::var_os(alfred::CONFIG_ENV_VAR).map(PathBuf::from));
    match path {
        Some(path) => load_config(&path),
        None => Ok(AlfredConfig::default()),
    }
}

fn run(args: Args) -> CoreResult<Value> {
    if let Command::Tools = args.command {
        return Ok(ToolRegistry::describe());
    }

    let config = load(args.config)?;
    let cx = ToolContext::new(config)?;

    match args.command {
        Command::Tools => Ok(ToolRegistry::describe()),
        Command::Call { tool, args } => {
            let input: Value = serde_json::from_str(&args).map_err(|error| {
                CoreError::InvalidInput(format!("--args is not valid JSON: {error}"))
            })?;
            ToolRegistry::dispatch(&tool, &input, &cx)
        }
        Command::Find {
            name,
            root,
            mode,
            first,
            concurrency,
            ignore_case,
        } => {
            let root = cx.search_root(root.as_deref())?;
            let mut request = SearchRequest::new(&root, name.as_str())
                .mode(mode.into())
                .case_sensitive(!ignore_case)
                .max_concurrency(
                    concurrency.unwrap_or_else(|| cx.search_context().default_concurrency()),
                );
            if first {
                request = request.first_match();
            }
            let matches = cx.search(&request);
            Ok(json!({
                "target": name,
                "root": root.to_string_lossy(),
                "status": matches.status,
                "paths": matches.paths.iter().map(|path| path.to_string_lossy()).collect::<Vec<_>>(),
                "count": matches.paths.len(),
                "scannedDirs": matches.stats.scanned_dirs,
                "skippedDirs": matches.stats.skipped_dirs,
                "elapsedMs": matches.stats.elapsed.as_millis() as u64,
            }))
        }
    }
}

fn error_payload(error: &CoreError) -> Value {
    match error {
        CoreError::Ambiguous { target, paths } => json!({
            "error": error.to_string(),
            "kind": error.kind(),
            "target": target,
            "paths": paths.iter().map(|path| path.to_string_lossy()).collect::<Vec<_>>(),
        }),
        _ => json!({
            "error": error.to_string(),
            "kind": error.kind(),
        }),
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
