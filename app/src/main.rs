use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use aura_ai::search::StaticProvider;
use aura_core::config::Threshold;
use aura_core::error::{codes, AppError};
use aura_core::report::{render_markdown, CheckRequest, DEFAULT_TOP_K};
use aura_lib::settings::{EmbedBackend, Settings};
use aura_lib::{ai_health_check, logging, now_rfc3339_utc, run_request, serve, AppState};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "aura", version, about = "Embedding-based plagiarism checker")]
struct Cli {
    /// Settings file (defaults to ./aura.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbedderArg {
    Ollama,
    Hashed,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a document against candidate web sources
    Check {
        /// Text to check; read from stdin when omitted and no --file is given
        text: Option<String>,
        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
        /// Similarity threshold in (0, 1]
        #[arg(long)]
        threshold: Option<f32>,
        /// JSON file of {url, snippet} candidates; skips web search
        #[arg(long)]
        sources: Option<PathBuf>,
        #[arg(long, value_enum)]
        embedder: Option<EmbedderArg>,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Ask the local model for a rewrite when similarity is high
        #[arg(long)]
        rewrite: bool,
    },
    /// Answer JSON-line check requests on stdin until EOF
    Serve,
    /// Check that the local Ollama daemon is reachable
    Health,
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String, AppError> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(path) = file {
        return fs::read_to_string(&path).map_err(|e| {
            AppError::new(codes::INPUT_READ_FAILED, "Failed to read input file")
                .with_details(format!("path={}; err={e}", path.display()))
        });
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).map_err(|e| {
        AppError::new(codes::INPUT_READ_FAILED, "Failed to read stdin").with_details(e.to_string())
    })?;
    Ok(buf)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        AppError::new(codes::REQUEST_INVALID, "Failed to encode output").with_details(e.to_string())
    })?;
    println!("{json}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_check(
    mut settings: Settings,
    text: Option<String>,
    file: Option<PathBuf>,
    top_k: u32,
    threshold: Option<f32>,
    sources: Option<PathBuf>,
    embedder: Option<EmbedderArg>,
    format: OutputFormat,
    rewrite: bool,
) -> Result<(), AppError> {
    if let Some(t) = threshold {
        settings.scoring.threshold = Threshold::new(t)?;
    }
    if let Some(e) = embedder {
        settings.embed.backend = match e {
            EmbedderArg::Ollama => EmbedBackend::Ollama,
            EmbedderArg::Hashed => EmbedBackend::Hashed,
        };
    }
    settings.rewrite.enabled |= rewrite;

    let mut state = AppState::from_settings(settings)?;
    if let Some(path) = sources {
        state.replace_provider(Arc::new(StaticProvider::from_json_file(&path)?));
    }
    let state = Arc::new(state);

    let request = CheckRequest::new(read_input(text, file)?).with_top_k(top_k);
    let outcome = run_request(&state, request)?;

    match format {
        OutputFormat::Json => print_json(&outcome.response),
        OutputFormat::Markdown => {
            let generated_at = now_rfc3339_utc()?;
            print!("{}", render_markdown(&outcome.result, &outcome.response, &generated_at));
            Ok(())
        }
    }
}

fn run(cli: Cli, settings: Settings) -> Result<(), AppError> {
    match cli.command {
        Commands::Check {
            text,
            file,
            top_k,
            threshold,
            sources,
            embedder,
            format,
            rewrite,
        } => cmd_check(settings, text, file, top_k, threshold, sources, embedder, format, rewrite),
        Commands::Serve => {
            let state = Arc::new(AppState::from_settings(settings)?);
            serve::run_stdio(state).map(|_| ())
        }
        Commands::Health => print_json(&ai_health_check(&settings)?),
    }
}

fn fail(e: &AppError) -> ExitCode {
    match serde_json::to_string(e) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{e}"),
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            logging::init(logging::DEFAULT_FILTER);
            return fail(&e);
        }
    };
    let rust_log = std::env::var("RUST_LOG").ok();
    logging::init(&logging::filter_directive(
        cli.verbose,
        rust_log.as_deref(),
        &settings.log_filter,
    ));

    match run(cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code, "command failed");
            fail(&e)
        }
    }
}
