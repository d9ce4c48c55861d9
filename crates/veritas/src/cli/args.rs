//! Clap argument definitions for the `veritas` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use veritas_rank::Language;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "veritas")]
#[command(about = "Veritas - Answers grounded in the sentences of a document")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `veritas rank`.
#[derive(Args, Debug, Clone)]
pub struct RankCommand {
    /// Text document, pages separated by form feeds
    pub file: PathBuf,

    /// Question or keywords to rank pages against
    pub query: String,

    /// Maximum pages to return [default: ranking.top_k]
    #[arg(short = 'n', long)]
    pub top_k: Option<usize>,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `veritas sentences`.
#[derive(Args, Debug, Clone)]
pub struct SentencesCommand {
    /// Text document, pages separated by form feeds
    pub file: PathBuf,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `veritas align`.
#[derive(Args, Debug, Clone)]
pub struct AlignCommand {
    /// File with one source sentence per line
    pub sources: PathBuf,

    /// Generated answer, or @FILE to read it from a file
    pub generated: String,

    /// Similarity required for a verified sentence [default: alignment.primary_threshold]
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `veritas ground`.
#[derive(Args, Debug, Clone)]
pub struct GroundCommand {
    /// JSON array of alignment records, as printed by `veritas align --json`
    pub records: PathBuf,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `veritas answer`.
#[derive(Args, Debug, Clone)]
pub struct AnswerCommand {
    /// Text document, pages separated by form feeds
    pub file: PathBuf,

    /// Question to answer
    pub question: String,

    /// Generated answer to verify, or @FILE to read it from a file
    #[arg(short = 'g', long)]
    pub generated: String,

    /// Upstream sentence selection output (JSON with `selected_sentences`)
    #[arg(long)]
    pub selected: Option<PathBuf>,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `veritas init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.veritas.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,

    /// Set the stopword and stemmer language (english, french, german, ...)
    #[arg(long, value_name = "LANG")]
    pub language: Option<Language>,

    /// Write the built-in domain weights and synonyms as editable tables
    #[arg(long)]
    pub domain_tables: bool,
}

/// Supported `veritas` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rank the pages of a document against a query
    #[command(after_help = "\
EXAMPLES:
  veritas rank contrat.txt 'durée de conservation'
  veritas rank contrat.txt 'effacement des données' -n 3 --json")]
    Rank(RankCommand),

    /// Split a document into pages and sentences
    Sentences(SentencesCommand),

    /// Align a generated answer against source sentences
    Align(AlignCommand),

    /// Build a grounded answer from alignment records
    Ground(GroundCommand),

    /// Verify a generated answer against a document
    #[command(after_help = "\
The answer is rebuilt from the document's own sentences. Generated sentences that
match no source closely enough are dropped; if none match, the answer is a refusal.

EXAMPLES:
  veritas answer contrat.txt 'Combien de temps ?' -g 'Les données sont conservées cinq ans.'
  veritas answer contrat.txt 'Combien de temps ?' -g @reponse.txt --selected selection.json")]
    Answer(AnswerCommand),

    /// Initialize veritas configuration in current directory
    #[command(after_help = "\
EXAMPLES:
  veritas init
  veritas init --language english
  veritas init --global --domain-tables")]
    Init(InitCommand),

    /// Show status and validate configuration
    Status,

    /// Show effective configuration settings
    Config,
}
