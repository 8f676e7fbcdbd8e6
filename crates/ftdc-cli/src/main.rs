/// FTDC command-line tool — inspect, validate, decode, and analyse
/// MongoDB diagnostic (`.ftdc` / `metrics.*`) archive files.
///
/// # Command overview
///
/// ```text
/// ftdc <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Walk chunk envelopes and print an offset table
///   validate   Check an archive decodes end to end
///   decode     Print decoded sample records as JSON Lines
///   stats      Print aggregate archive statistics
///   help       Print help information
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                   |
/// |------|-------------------------------------------|
/// | 0    | Success                                   |
/// | 1    | Error (I/O failure, invalid archive, etc.) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod cmd_decode;
mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The FTDC (Full Time Diagnostic Capture) command-line tool.
///
/// Inspect, validate, decode, and analyse FTDC metric archives.
#[derive(Parser)]
#[command(name = "ftdc", version, about = "FTDC archive decoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Walk chunk envelopes and print an offset table without decompressing.
    Inspect(InspectArgs),
    /// Check an archive for structural correctness.
    Validate(ValidateArgs),
    /// Decode an archive and print sample records as JSON Lines.
    Decode(DecodeArgs),
    /// Print size and content statistics for an archive.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `ftdc inspect`.
///
/// Walks the envelope layer only — no payload is decompressed — and
/// prints one line per envelope: index, archive offset, envelope
/// length, chunk type, capture id, and compressed payload size. Fast
/// even on multi-hundred-megabyte archives.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the FTDC archive to inspect.
    pub file: PathBuf,

    /// Stop after this many envelopes.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `ftdc validate`.
///
/// Runs a full decode of every chunk and reports either a set of
/// success checkmarks or a diagnostic error naming the failing chunk's
/// byte offset. Exits with code 0 on a valid archive and 1 otherwise.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the FTDC archive to validate.
    pub file: PathBuf,
}

/// Arguments for `ftdc decode`.
///
/// Decodes the archive and prints one JSON object per sample record
/// (JSON Lines), keys in capture order. Output goes to stdout unless
/// `-o` is given.
///
/// ```text
/// ┌────────────┬───────────────────────────────────────────────────────┐
/// │ Flag       │ Effect                                                │
/// ├────────────┼───────────────────────────────────────────────────────┤
/// │ --include  │ comma-separated key prefixes to keep                  │
/// │ --limit    │ cap the number of emitted records                     │
/// │ --metadata │ emit a per-batch header object before its records     │
/// │ -o/--output│ write to a file instead of stdout                     │
/// └────────────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Path to the FTDC archive to decode.
    pub file: PathBuf,

    /// Comma-separated list of metric key prefixes to include
    /// (e.g. `serverStatus.opcounters,replSetGetStatus`).
    ///
    /// When set, only metrics whose dot-joined key starts with one of
    /// the prefixes appear in the output.
    #[arg(long)]
    pub include: Option<String>,

    /// Emit at most this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Precede each batch's records with a metadata object
    /// (`{"batch": {...}}` with offset, capture id, and counts).
    #[arg(long)]
    pub metadata: bool,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `ftdc stats`.
///
/// Decodes the archive and prints an aggregate report: envelope and
/// chunk counts, record totals, metric count, compressed vs
/// decompressed byte totals, and the capture time span.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the FTDC archive to analyse.
    pub file: PathBuf,

    /// Emit the report as a single JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
