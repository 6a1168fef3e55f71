//! Chrome CLI - replay host event traces through the storefront chrome controllers
//!
//! Commands:
//! - replay: Run a trace document and write frames (batch mode)
//! - run: Read NDJSON events from stdin and emit one frame per line (streaming mode)
//! - menu: Resolve header navigation links
//! - schema: Print the trace schema

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use storefront_chrome::menu::{nav_links, resolve_menu, Menu, NavContext, Viewport};
use storefront_chrome::session::{
    parse_trace, replay, AutoplayPolicy, ChromeSession, ReplayEvent, ReplayReport, ScriptedMedia,
};
use storefront_chrome::{ChromeConfig, CHROME_VERSION};

/// Chrome - scroll-driven header and hero state for storefronts
#[derive(Parser)]
#[command(name = "chrome")]
#[command(version = CHROME_VERSION)]
#[command(about = "Replay scroll traces through the storefront chrome controllers", long_about = None)]
struct Cli {
    /// Log controller transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace document (batch mode)
    Replay {
        /// Trace file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Configuration file overriding the trace's config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the trace's autoplay policy
        #[arg(long)]
        autoplay: Option<AutoplayArg>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Read NDJSON events from stdin and write one frame per line (streaming mode)
    Run {
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// How the video element answers the play command
        #[arg(long, default_value = "allowed")]
        autoplay: AutoplayArg,

        /// Buffer output instead of flushing after each frame
        #[arg(long)]
        no_flush: bool,
    },

    /// Resolve header navigation links from a menu document
    Menu {
        /// Menu JSON file (fallback menu when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, default_value = "desktop")]
        viewport: ViewportArg,

        /// Public store domain (e.g. "acme.myshopify.com")
        #[arg(long, default_value = "")]
        public_store_domain: String,

        /// Primary domain URL (e.g. "https://acme.com")
        #[arg(long, default_value = "")]
        primary_domain_url: String,
    },

    /// Print the trace schema
    Schema {
        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// Full report as JSON
    Json,
    /// Full report as pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum AutoplayArg {
    Allowed,
    Rejected,
    Missing,
}

impl From<AutoplayArg> for AutoplayPolicy {
    fn from(arg: AutoplayArg) -> Self {
        match arg {
            AutoplayArg::Allowed => AutoplayPolicy::Allowed,
            AutoplayArg::Rejected => AutoplayPolicy::Rejected,
            AutoplayArg::Missing => AutoplayPolicy::Missing,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewportArg {
    Desktop,
    Mobile,
}

impl From<ViewportArg> for Viewport {
    fn from(arg: ViewportArg) -> Self {
        match arg {
            ViewportArg::Desktop => Viewport::Desktop,
            ViewportArg::Mobile => Viewport::Mobile,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), ChromeCliError> {
    match cli.command {
        Commands::Replay {
            input,
            output,
            config,
            autoplay,
            output_format,
        } => cmd_replay(&input, &output, config.as_deref(), autoplay, output_format),

        Commands::Run {
            config,
            autoplay,
            no_flush,
        } => cmd_run(config.as_deref(), autoplay, !no_flush),

        Commands::Menu {
            input,
            viewport,
            public_store_domain,
            primary_domain_url,
        } => cmd_menu(
            input.as_deref(),
            NavContext {
                viewport: viewport.into(),
                public_store_domain,
                primary_domain_url,
            },
        ),

        Commands::Schema { json_schema } => cmd_schema(json_schema),
    }
}

fn cmd_replay(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    autoplay: Option<AutoplayArg>,
    output_format: OutputFormat,
) -> Result<(), ChromeCliError> {
    let input_data = read_input(input)?;
    let mut trace = parse_trace(&input_data)?;

    if trace.events.is_empty() {
        return Err(ChromeCliError::NoEvents);
    }
    if let Some(path) = config {
        trace.config = load_config(path)?;
    }
    if let Some(policy) = autoplay {
        trace.autoplay = policy.into();
    }

    let report = replay(&trace)?;
    let output_data = format_report(&report, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(config: Option<&Path>, autoplay: AutoplayArg, flush: bool) -> Result<(), ChromeCliError> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => ChromeConfig::default(),
    };
    let media = ScriptedMedia::new(autoplay.into());
    let mut session = ChromeSession::with_media(config, Box::new(media));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let event: ReplayEvent = serde_json::from_str(trimmed).map_err(|e| {
            ChromeCliError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;

        let frame = session.process(&event)?;
        writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    session.unmount();
    stdout.flush()?;
    Ok(())
}

fn cmd_menu(input: Option<&Path>, ctx: NavContext) -> Result<(), ChromeCliError> {
    let menu = match input {
        Some(path) => Some(Menu::from_json(&read_input(path)?)?),
        None => None,
    };
    let links = nav_links(&resolve_menu(menu), &ctx);
    println!("{}", serde_json::to_string_pretty(&links)?);
    Ok(())
}

fn cmd_schema(json_schema: bool) -> Result<(), ChromeCliError> {
    if json_schema {
        println!("{}", get_trace_json_schema());
        return Ok(());
    }

    println!("Trace Schema");
    println!();
    println!("A trace is a JSON object with:");
    println!("- config (optional): {{ header: {{...}}, hero: {{...}} }} overrides");
    println!("- autoplay (optional): allowed | rejected | missing");
    println!("- events: array of host events, non-decreasing at_ms:");
    println!("  - {{ type: scroll, at_ms, position }}");
    println!("  - {{ type: overlay, at_ms, state: closed | mobile | search | cart }}");
    println!("  - {{ type: tick, at_ms }}");
    println!("  - {{ type: unmount, at_ms }}");
    println!();
    println!("Each event yields a frame with visibility, header, hero and parallax state.");
    Ok(())
}

// Helper functions

fn read_input(path: &Path) -> Result<String, ChromeCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn load_config(path: &Path) -> Result<ChromeConfig, ChromeCliError> {
    let json = fs::read_to_string(path)?;
    Ok(ChromeConfig::from_json(&json)?)
}

fn format_report(report: &ReplayReport, format: &OutputFormat) -> Result<String, ChromeCliError> {
    match format {
        OutputFormat::Ndjson => {
            let lines = report
                .frames
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<String>, _>>()?;
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

fn get_trace_json_schema() -> String {
    let at_ms = serde_json::json!({ "type": "integer", "minimum": 0 });
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "storefront-chrome trace",
        "type": "object",
        "required": ["events"],
        "properties": {
            "config": { "type": "object" },
            "autoplay": { "type": "string", "enum": ["allowed", "rejected", "missing"] },
            "events": {
                "type": "array",
                "items": {
                    "oneOf": [
                        {
                            "type": "object",
                            "required": ["type", "at_ms", "position"],
                            "properties": {
                                "type": { "const": "scroll" },
                                "at_ms": at_ms,
                                "position": { "type": "integer" }
                            }
                        },
                        {
                            "type": "object",
                            "required": ["type", "at_ms", "state"],
                            "properties": {
                                "type": { "const": "overlay" },
                                "at_ms": at_ms,
                                "state": { "enum": ["closed", "mobile", "search", "cart"] }
                            }
                        },
                        {
                            "type": "object",
                            "required": ["type", "at_ms"],
                            "properties": {
                                "type": { "enum": ["tick", "unmount"] },
                                "at_ms": at_ms
                            }
                        }
                    ]
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum ChromeCliError {
    Io(io::Error),
    Chrome(storefront_chrome::ChromeError),
    Json(serde_json::Error),
    NoEvents,
    ParseError(String),
}

impl From<io::Error> for ChromeCliError {
    fn from(e: io::Error) -> Self {
        ChromeCliError::Io(e)
    }
}

impl From<storefront_chrome::ChromeError> for ChromeCliError {
    fn from(e: storefront_chrome::ChromeError) -> Self {
        ChromeCliError::Chrome(e)
    }
}

impl From<serde_json::Error> for ChromeCliError {
    fn from(e: serde_json::Error) -> Self {
        ChromeCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ChromeCliError> for CliError {
    fn from(e: ChromeCliError) -> Self {
        match e {
            ChromeCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ChromeCliError::Chrome(e) => CliError {
                code: "CHROME_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'chrome schema' for the expected trace layout".to_string()),
            },
            ChromeCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ChromeCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "Trace contains no events".to_string(),
                hint: Some("Add at least one scroll, overlay, tick or unmount event".to_string()),
            },
            ChromeCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Each line must be a single event object".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_flush(args: &[&str]) -> bool {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run { no_flush, .. } => !no_flush,
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_flushes_by_default() {
        assert!(run_flush(&["chrome", "run"]));
    }

    #[test]
    fn test_run_no_flush_disables_flushing() {
        assert!(!run_flush(&["chrome", "run", "--no-flush"]));
    }
}
