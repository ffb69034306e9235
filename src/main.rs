use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doclearn::cli::commands::generate::GenerateOptions;
use doclearn::config::OutputFormat;
use doclearn::types::KnowledgeLevel;

#[derive(Parser)]
#[command(name = "doclearn")]
#[command(
    version,
    about = "Generate topic study guides with an LLM and Wikipedia context"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a study guide for a topic
    Generate {
        #[arg(help = "Topic to write about")]
        topic: String,
        #[arg(
            short = 'l',
            long,
            help = "Knowledge level: basic, intermediate, expert"
        )]
        level: Option<KnowledgeLevel>,
        #[arg(short = 'f', long, help = "Output format: markdown, pdf")]
        format: Option<OutputFormat>,
        #[arg(short = 'o', long, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long, help = "LLM provider (gemini, openai, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Also print the Markdown to stdout")]
        print: bool,
    },

    /// Look up the encyclopedia summary for a term
    Lookup {
        #[arg(help = "Term to look up")]
        term: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mDocLearn encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            topic,
            level,
            format,
            output,
            provider,
            model,
            print,
        } => {
            doclearn::cli::commands::generate::run(GenerateOptions {
                topic,
                level,
                format,
                output,
                provider,
                model,
                print,
                quiet: cli.quiet,
            })?;
        }
        Commands::Lookup { term } => {
            doclearn::cli::commands::lookup::run(&term)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                doclearn::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                doclearn::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                doclearn::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
