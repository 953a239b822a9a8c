//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use gtolens_engine::formats::FormatKind;

#[derive(Parser, Debug)]
#[command(
    name = "gtolens",
    version,
    about = "Score PLO hand histories against solved-game strategies"
)]
pub struct GtolensCli {
    /// Log engine decisions to stderr at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

/// Hand-history dialect of the input file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HistoryFormatArg {
    Adda52,
    Pokerstars,
}

impl From<HistoryFormatArg> for FormatKind {
    fn from(arg: HistoryFormatArg) -> Self {
        match arg {
            HistoryFormatArg::Adda52 => FormatKind::Adda52,
            HistoryFormatArg::Pokerstars => FormatKind::PokerStars,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every hero decision in a hand-history file
    Evaluate {
        #[arg(long)]
        input: String,
        #[arg(long, value_enum)]
        format: HistoryFormatArg,
        /// SQLite database or `.json` document store
        #[arg(long)]
        store: Option<String>,
        /// JSONL results file
        #[arg(long)]
        output: String,
        #[arg(long)]
        hero: Option<String>,
        #[arg(long)]
        rake: Option<u32>,
        /// Stack depth in big blinds when the history does not record one
        #[arg(long)]
        stack_bb: Option<f64>,
        /// Also evaluate hero decisions on the flop
        #[arg(long)]
        flop: bool,
    },
    /// Print the decision points of each hand without consulting a store
    Inspect {
        #[arg(long)]
        input: String,
        #[arg(long, value_enum)]
        format: HistoryFormatArg,
        #[arg(long)]
        hero: Option<String>,
        #[arg(long)]
        flop: bool,
    },
    /// Convert a results file to csv, json or sqlite
    Export {
        #[arg(long)]
        input: String,
        #[arg(long)]
        format: String,
        #[arg(long)]
        output: String,
    },
    /// Summarize a results file
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
