use clap::{Parser, Subcommand};
use lumen_engine::backend::Backend;
use lumen_engine::cli::{self, CliError, Console, ReplOptions, ScriptOptions};
use lumen_engine::config::{ConfigLoader, LumenConfig};
use lumen_engine::executor::CommandExecutor;
use lumen_h::backend::HeadlessBackend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen", version, about = "Contrast issue inspector")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Script to execute (non-interactive mode)
    #[arg(long)]
    file: Option<String>,

    /// Config file (default: ./lumen.yaml, then ~/.lumen/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep running a script after a failing line
    #[arg(long)]
    keep_going: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Use headless browser (Chromium) via CDP
    Headless {
        /// Launch browser in visible mode (not headless)
        #[arg(long)]
        visible: bool,
    },
}

async fn load_config(path: Option<&PathBuf>) -> Result<LumenConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match load_config(args.config.as_ref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return Err(e);
        }
    };

    // stdout carries reports; logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Loaded config: {:?}", config);

    let mut backend: Box<dyn Backend> = match args.mode {
        Mode::Headless { visible } => {
            config.browser.visible |= visible;
            Box::new(HeadlessBackend::new(config))
        }
    };

    if let Err(e) = backend.launch().await {
        eprintln!("Failed to launch backend: {}", e);
        return Err(e.into());
    }

    let mut executor = CommandExecutor::new();
    let mut console = Console::stdio();
    let repl_options = ReplOptions {
        banner_lines: &[
            "Backend launched. Enter commands (e.g., 'goto example.com', 'check').",
            "Type 'help' for all commands, 'exit' or 'quit' to close.",
        ],
        prompt: "> ",
        exit_commands: &["exit", "quit"],
        handle_ctrl_c: true,
    };

    let outcome = if let Some(file_path) = args.file {
        cli::run_file(
            &mut *backend,
            &mut executor,
            &mut console,
            &file_path,
            ScriptOptions {
                stop_on_error: !args.keep_going,
            },
        )
        .await
        .inspect_err(|e| {
            // Failing lines were already reported by the console.
            if let CliError::Io(e) = e {
                eprintln!("Error reading file {}: {}", file_path, e);
            }
        })
    } else {
        cli::run_repl(&mut *backend, &mut executor, &mut console, repl_options)
            .await
            .inspect_err(|e| eprintln!("Error during session: {}", e))
    };

    backend.close().await?;
    Ok(outcome?)
}
