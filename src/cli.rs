use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "complaint-risk")]
#[command(about = "LLM analysis and risk-category evaluation for financial complaints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse one complaint text and print the result as JSON
    Single {
        /// Complaint narrative
        #[arg(short, long)]
        text: String,

        /// Do not record a tracking run
        #[arg(long)]
        no_tracking: bool,
    },

    /// Analyse the text column of a CSV and write scored rows
    Batch {
        /// Input CSV
        #[arg(short, long = "in-csv")]
        in_csv: PathBuf,

        /// Output CSV
        #[arg(short, long = "out-csv")]
        out_csv: PathBuf,

        /// Maximum rows to analyse (larger inputs are sampled)
        #[arg(short = 'n', long, default_value = "200")]
        limit: usize,

        /// Column holding the complaint text
        #[arg(long, default_value = "text")]
        text_column: String,

        /// Sampling seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Do not record tracking runs
        #[arg(long)]
        no_tracking: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Score predictions against heuristic labels
    Evaluate {
        /// Scored CSV (risk_category, Issue, Product)
        #[arg(short, long = "in-csv")]
        in_csv: PathBuf,

        /// Decimal places in the report
        #[arg(long, default_value = "3")]
        digits: usize,

        /// Also print the confusion matrix
        #[arg(long)]
        confusion: bool,
    },

    /// Clean and sample a raw complaint export
    Ingest {
        /// Raw export CSV
        #[arg(short, long = "in-csv")]
        in_csv: PathBuf,

        /// Cleaned output CSV
        #[arg(short, long = "out-csv")]
        out_csv: PathBuf,

        /// Sample size
        #[arg(short = 'n', long, default_value = "5000")]
        sample_size: usize,

        /// Sampling seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Show or edit settings
    Config {
        /// Store an API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Print current settings
        #[arg(long)]
        show: bool,
    },
}
