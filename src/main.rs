use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dialoguer::Input;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use docask::docs::{AskOutcome, ClearOutcome, HttpBackend, RefreshOutcome, UploadOutcome};
use docask::view::TerminalView;
use docask::{AppSettings, Config, DocsApp};

/// Upload documents to an ingestion server and ask questions about them.
#[derive(Parser)]
#[command(name = "docask", version, about)]
struct Cli {
    /// Server base URL (overrides config and DOCASK_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF or Word document
    Upload {
        path: PathBuf,
    },
    /// Show the current file table
    Files,
    /// Keep the file table up to date until Ctrl-C
    Watch,
    /// Ask a question about the uploaded documents
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Delete every uploaded document
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive session with live file status
    Shell,
    /// Print the effective configuration
    Config {
        /// Print the JSON Schema of the config file instead
        #[arg(long)]
        schema: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref(), cli.server.as_deref())?;

    let assume_yes = matches!(cli.command, Commands::Clear { yes: true });
    let cancel = CancellationToken::new();
    let backend = Arc::new(HttpBackend::with_cancellation(
        &config.server.base_url,
        config.request_timeout(),
        cancel.clone(),
    )?);
    let view = Arc::new(TerminalView::new(assume_yes));
    let mut app = DocsApp::new(backend, view, AppSettings::from(&config));
    tracing::debug!(server = %config.server.base_url, "client ready");

    let ok = match cli.command {
        Commands::Upload { path } => {
            let outcome = app.upload(Some(&path)).await;
            matches!(outcome, UploadOutcome::Uploaded(_))
        }
        Commands::Files => matches!(app.refresh().await, RefreshOutcome::Rendered(_)),
        Commands::Watch => {
            app.start_polling();
            tokio::signal::ctrl_c().await?;
            app.stop_polling().await;
            cancel.cancel();
            true
        }
        Commands::Ask { question } => {
            matches!(app.ask(&question.join(" ")).await, AskOutcome::Answered(_))
        }
        Commands::Clear { .. } => !matches!(app.clear_all().await, ClearOutcome::Failed(_)),
        Commands::Shell => {
            run_shell(&mut app).await?;
            cancel.cancel();
            true
        }
        Commands::Config { schema } => {
            if schema {
                println!("{}", Config::json_schema()?);
            } else {
                print!("{}", config.to_toml()?);
            }
            true
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "docask", &mut std::io::stdout());
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

enum ShellCommand<'a> {
    Upload(Option<&'a Path>),
    Ask(&'a str),
    Clear,
    Files,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_shell_line(line: &str) -> ShellCommand<'_> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match word {
        "upload" | "u" => ShellCommand::Upload((!rest.is_empty()).then(|| Path::new(rest))),
        "ask" | "a" | "?" => ShellCommand::Ask(rest),
        "clear" => ShellCommand::Clear,
        "files" | "ls" => ShellCommand::Files,
        "help" | "h" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(word),
    }
}

const SHELL_HELP: &str = "\
commands:
  upload <path>    upload a PDF or Word document
  ask <question>   ask about the uploaded documents
  files            show the file table
  clear            delete every uploaded document
  quit             leave";

async fn run_shell(app: &mut DocsApp) -> Result<()> {
    println!("{SHELL_HELP}");
    app.start_polling();
    loop {
        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("docask")
                .allow_empty(true)
                .interact_text()
        })
        .await?;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!("input closed: {e}");
                break;
            }
        };

        match parse_shell_line(&line) {
            ShellCommand::Upload(path) => {
                let path =
                    path.map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()));
                app.upload(path.as_deref()).await;
            }
            ShellCommand::Ask(question) => {
                app.ask(question).await;
            }
            ShellCommand::Clear => {
                app.clear_all().await;
            }
            ShellCommand::Files => {
                app.refresh().await;
            }
            ShellCommand::Help => println!("{SHELL_HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::Unknown("") => {}
            ShellCommand::Unknown(word) => {
                app.notifier().notify(format!("Unknown command: {word}"));
            }
        }
    }
    app.stop_polling().await;
    Ok(())
}
