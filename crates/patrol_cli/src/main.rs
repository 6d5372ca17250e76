//! # Commands
//!
//! - `patrol scan` - Scan files against the configured patterns
//! - `patrol patterns` - List, add, edit or remove patterns
//! - `patrol report` - Scan and write a markdown report
//! - `patrol lookup` - Show the finding at a file and line
//! - `patrol init` - Create a configuration file with starter patterns

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod files;
mod scanning;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
pub use patrol_core::CONFIG_FILENAME;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/patrol-scanner/patrol";

#[derive(Debug, Parser)]
#[command(
    name = "patrol",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "p")]
    Patterns(PatternsArgs),

    #[command(visible_alias = "r")]
    Report(ReportArgs),

    #[command(visible_alias = "l")]
    Lookup(LookupArgs),

    Init(InitArgs),
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// Findings grouped by pattern name.
    Tree,
}

/// File selection flags shared by every command that scans.
#[derive(Debug, Clone, clap::Args)]
pub struct SelectionArgs {
    /// Paths to scan.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to `.patrol.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only scan files matching this glob.
    #[arg(short, long, value_name = "GLOB")]
    pub include: Option<String>,

    /// Glob patterns to exclude from scanning.
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip `.gitignore` rules when collecting files.
    #[arg(long)]
    pub skip_gitignore: bool,
}

/// Arguments for the `patrol scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Paths and file filters to scan.
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Also write a markdown report under `security-reports/`.
    #[arg(long)]
    pub report: bool,

    /// Workspace root for `--report` (defaults to the config file's directory).
    #[arg(long, requires = "report")]
    pub root: Option<PathBuf>,

    /// Always exit with code 0, even when findings are present.
    #[arg(long)]
    pub exit_zero: bool,
}

/// Arguments for the `patrol patterns` command.
#[derive(Debug, Parser)]
pub struct PatternsArgs {
    /// Path to `.patrol.toml` configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Pattern subcommand (defaults to `list`).
    #[command(subcommand)]
    pub command: Option<PatternsCommand>,
}

/// Subcommands for `patrol patterns`.
#[derive(Debug, Subcommand)]
pub enum PatternsCommand {
    /// List configured patterns.
    List {
        /// Show the regular expression for each pattern.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Add a pattern. Missing fields are prompted for.
    Add(PatternFields),
    /// Replace an existing pattern. Missing fields are prompted for.
    Edit {
        /// Name of the pattern to edit (prompts for a choice when omitted).
        target: Option<String>,

        /// Replacement field values.
        #[command(flatten)]
        fields: PatternFields,
    },
    /// Remove a pattern by name.
    Remove {
        /// Name of the pattern to remove (prompts for a choice when omitted).
        target: Option<String>,
    },
}

/// Field values for adding or editing a pattern.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PatternFields {
    /// Pattern name.
    #[arg(long)]
    pub name: Option<String>,

    /// Regular expression matched against each line.
    #[arg(long, value_name = "REGEX")]
    pub regex: Option<String>,

    /// Human-readable description shown with findings.
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for the `patrol report` command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Paths and file filters to scan.
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Workspace root that receives the `security-reports/` directory
    /// (defaults to the config file's directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the `patrol lookup` command.
#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// File to inspect.
    pub file: PathBuf,

    /// 1-based line number.
    pub line: u32,

    /// Path to `.patrol.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `patrol init` command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing file without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Write the config file to a custom path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scan(args) => commands::scan::run(&args),
        Command::Patterns(args) => commands::patterns::run(args),
        Command::Report(args) => commands::report::run(&args),
        Command::Lookup(args) => commands::lookup::run(&args),
        Command::Init(args) => commands::init::run(args.yes, args.output),
    }
}

fn build_about() -> String {
    format!(
        r"
  {} scans source files line by line for risky code patterns.

  Patterns are plain regular expressions kept in `.patrol.toml`,
  so every team can describe what it considers unsafe.",
        colors::accent().apply_to("patrol").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    patrol init                        Create config with starter patterns
    patrol scan .                      Scan current directory
    patrol scan src/ --format tree     Group findings by pattern
    patrol scan . --report             Also write a markdown report
    patrol patterns add                Add a pattern interactively
    patrol lookup src/app.js 42        Explain the finding on a line

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
