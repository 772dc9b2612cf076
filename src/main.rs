//! sensory-survey CLI
//!
//! Build tactile sensory-evaluation questionnaires, collect yes/no
//! answers per term, and export them as a spreadsheet.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use humansize::{format_size, BINARY};
use tracing_subscriber::EnvFilter;

use sensory_survey::form;
use sensory_survey::platform::{self, default_export_dir, default_log_path, save_artifact};
use sensory_survey::report::format_records;
use sensory_survey::session::{Intent, Outcome, Request, Session};
use sensory_survey::taxonomy;
use sensory_survey::tui;
use sensory_survey::types::{Answer, ExportConfig, FormConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "sensory-survey")]
#[command(about = "Build tactile sensory-evaluation questionnaires and export responses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory exported spreadsheets are saved into (default: downloads)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Label used as the export filename prefix
    #[arg(long, global = true)]
    label: Option<String>,

    /// Write logs to this file (TUI mode always logs to a file)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal session (default)
    Tui,

    /// List evaluation categories and their terms
    Categories {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Generate the questionnaire HTML for the given terms
    Form {
        /// Terms to ask about, in question order
        #[arg(required = true)]
        terms: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Page title and heading
        #[arg(long)]
        title: Option<String>,
    },

    /// Run a scripted two-respondent session and export it
    Demo {
        /// Output format for the records report
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // The alternate screen owns stdout/stderr while the TUI runs
    let log_file = match (&command, cli.log_file) {
        (_, Some(path)) => Some(path),
        (Commands::Tui, None) => Some(default_log_path()),
        _ => None,
    };
    if let Err(e) = init_logging(log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let out_dir = cli.out_dir.unwrap_or_else(default_export_dir);
    let export_config = match cli.label {
        Some(label) => ExportConfig {
            label,
            ..ExportConfig::default()
        },
        None => ExportConfig::default(),
    };

    let result = match command {
        Commands::Tui => cmd_tui(export_config, out_dir),
        Commands::Categories { format } => cmd_categories(format.into()),
        Commands::Form {
            terms,
            output,
            title,
        } => cmd_form(terms, output, title),
        Commands::Demo { format } => cmd_demo(export_config, &out_dir, format.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install the tracing subscriber. `RUST_LOG` overrides the default
/// `warn` level.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_tui(export_config: ExportConfig, out_dir: PathBuf) -> Result<()> {
    let session = Session::with_config(FormConfig::default(), export_config);
    tui::run::run(session, out_dir).context("terminal session failed")
}

fn cmd_categories(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for (name, terms) in taxonomy::CATEGORIES {
                println!("{}", name);
                for term in terms.iter() {
                    println!("  {}", term);
                }
            }
        }
        OutputFormat::Json => {
            let categories: Vec<_> = taxonomy::CATEGORIES
                .iter()
                .map(|(name, terms)| serde_json::json!({ "name": name, "terms": terms }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
    }
    Ok(())
}

fn cmd_form(terms: Vec<String>, output: Option<PathBuf>, title: Option<String>) -> Result<()> {
    let mut config = FormConfig::default();
    if let Some(title) = title {
        config.title = title;
    }
    let doc = form::generate_with(&terms, &config)?;

    match output {
        Some(path) => {
            platform::write_document(&path, &doc.html)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "Wrote {} questions to {} ({})",
                doc.question_count(),
                path.display(),
                format_size(doc.html.len(), BINARY)
            );
        }
        None => {
            std::io::stdout().write_all(doc.html.as_bytes())?;
        }
    }
    Ok(())
}

/// Two respondents answering 硬い / 柔らかい, then export.
fn cmd_demo(export_config: ExportConfig, out_dir: &Path, format: OutputFormat) -> Result<()> {
    let date = Local::now().date_naive();
    let script = [
        Intent::ToggleCategory {
            name: "硬軟感".into(),
            included: true,
        },
        Intent::ToggleTerm {
            term: "硬い".into(),
            included: true,
        },
        Intent::ToggleTerm {
            term: "柔らかい".into(),
            included: true,
        },
        Intent::Generate,
        Intent::SetDraftAnswer {
            term: "硬い".into(),
            answer: Answer::Yes,
        },
        Intent::SetDraftAnswer {
            term: "柔らかい".into(),
            answer: Answer::No,
        },
        Intent::Commit,
        Intent::SetDraftAnswer {
            term: "硬い".into(),
            answer: Answer::No,
        },
        Intent::SetDraftAnswer {
            term: "柔らかい".into(),
            answer: Answer::No,
        },
        Intent::Commit,
        Intent::Export { date },
    ];

    let mut session = Session::with_config(FormConfig::default(), export_config);
    let show_progress = format == OutputFormat::Human;

    for intent in script {
        let (next, outcome) = session.apply(intent);
        session = next;
        match outcome {
            Outcome::Changed => {}
            Outcome::Generated { questions } => {
                if show_progress {
                    eprintln!("Generated questionnaire with {} questions", questions);
                }
            }
            Outcome::Recorded { respondent_id } => {
                if show_progress {
                    eprintln!("Recorded respondent {}", respondent_id);
                }
            }
            Outcome::Request(Request::SaveFile(artifact)) => {
                let path = save_artifact(out_dir, &artifact)
                    .with_context(|| format!("saving into {}", out_dir.display()))?;
                eprintln!(
                    "Exported {} rows to {} ({})",
                    artifact.rows,
                    path.display(),
                    format_size(artifact.bytes.len(), BINARY)
                );
            }
            Outcome::Request(Request::OpenDocument(_)) => {}
            Outcome::Rejected(err) => bail!("demo step rejected: {}", err),
        }
    }

    print!(
        "{}",
        format_records(
            session.selection().terms(),
            session.collector().records(),
            format
        )
    );
    Ok(())
}
