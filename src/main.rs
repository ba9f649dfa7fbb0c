use clap::Parser;
use complaint_risk::{analyzer, batch, cli, config, evaluate, ingest, logging, tracking};
use analyzer::OpenAiClient;
use cli::{Cli, Commands};
use config::Config;
use complaint_risk::error::Result;
use tracking::Tracker;
use tracing::{error, info};

fn open_tracker(config: &Config, no_tracking: bool) -> Option<Tracker> {
    if no_tracking {
        return None;
    }
    Some(Tracker::open(&config.tracking_dir, &config.experiment))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Single { text, no_tracking } => {
            let client = OpenAiClient::new(&config)?;
            let tracker = open_tracker(&config, no_tracking);

            let analysis = match analyzer::analyze_text(&client, &text, tracker.as_ref()).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    error!(error = %e, "analysis failed");
                    std::process::exit(1);
                }
            };
            info!(
                model = %analysis.model,
                latency_s = analysis.latency.as_secs_f64(),
                "analysis complete"
            );
            println!("{}", serde_json::to_string_pretty(&analysis.outcome)?);
        }

        Commands::Batch {
            in_csv,
            out_csv,
            limit,
            text_column,
            seed,
            no_tracking,
            quiet,
        } => {
            let client = OpenAiClient::new(&config)?;
            let tracker = open_tracker(&config, no_tracking);
            let options = batch::BatchOptions {
                text_column,
                limit,
                seed,
                show_progress: !quiet,
            };

            let summary =
                batch::analyze_csv(&client, &in_csv, &out_csv, &options, tracker.as_ref()).await?;
            println!(
                "Saved {} rows to {} ({} failed)",
                summary.rows,
                out_csv.display(),
                summary.failures
            );
        }

        Commands::Evaluate {
            in_csv,
            digits,
            confusion,
        } => {
            let report = evaluate::evaluate_csv(&in_csv, confusion)?;
            print!("{}", report.render(digits));
        }

        Commands::Ingest {
            in_csv,
            out_csv,
            sample_size,
            seed,
        } => {
            let options = ingest::IngestOptions { sample_size, seed };
            let rows = ingest::load_sample(&in_csv, &out_csv, &options)?;
            println!("Saved {} rows to {}", rows, out_csv.display());
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                let path = Config::set_api_key(key.clone())?;
                config.api_key = Some(key);
                println!("API key saved to {}", path.display());
            }

            if show {
                println!("Settings:");
                println!("  model: {}", config.model);
                println!("  base_url: {}", config.base_url);
                println!("  temperature: {}", config.temperature);
                println!("  timeout_seconds: {}", config.timeout_seconds);
                println!("  tracking: {}/{}", config.tracking_dir.display(), config.experiment);
                println!("  api_key: {}", if config.api_key.is_some() { "set" } else { "not set" });
            }
        }
    }

    Ok(())
}
