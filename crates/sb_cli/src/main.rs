use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use sb_inference::models::create_model;
use sb_inference::{Backend, ModelClient};
use sb_metrics::Evaluator;
use sb_pipeline::{evaluate_summaries, Summarizer};
use sb_storage::{import_jsonl, load_dataset, DatasetStore, ImportOptions};

mod config;
mod logging;
mod shell;

use config::{AppConfig, Overrides};

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize datasets with a served LLM and score the results", long_about = None)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the OpenAI-compatible API (e.g. http://localhost:8000/v1)
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Inference backend: openai (default) or dummy
    #[arg(long, global = true)]
    backend: Option<Backend>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the models served by the backend
    Models,
    /// Interactive chat with one model
    Chat {
        #[arg(long)]
        model: Option<String>,
    },
    /// Summarize every record of a dataset and store the run
    Summarize {
        #[arg(long)]
        model: Option<String>,
        /// Dataset file; picked interactively from the data directory when omitted
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Score a summary run and store the report
    Evaluate {
        /// Summary file; defaults to the newest run for --dataset/--model
        input: Option<PathBuf>,
        #[arg(long, requires = "model")]
        dataset: Option<String>,
        #[arg(long, requires = "dataset")]
        model: Option<String>,
        /// Where reports go instead of the configured evaluation directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Build a dataset from a JSON-lines corpus export
    Import {
        corpus: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 30)]
        limit: usize,
        #[arg(long, default_value = "text")]
        text_field: String,
        #[arg(long, default_value = "summary")]
        reference_field: String,
    },
}

fn model_client(config: &AppConfig) -> anyhow::Result<ModelClient> {
    let model = create_model(&config.inference)?;
    info!("🧠 Inference model initialized successfully (using {})", model.name());
    Ok(ModelClient::from_config(model, &config.inference))
}

async fn pick_model(client: &ModelClient, config: &AppConfig, model: Option<String>) -> anyhow::Result<String> {
    match model {
        Some(model) => Ok(model),
        None => {
            let stdin = io::stdin();
            let model = shell::choose_model(client, &config.inference.default_model, &mut stdin.lock(), &mut io::stdout())
                .await?;
            Ok(model)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.apply(Overrides {
        api_base: cli.api_base,
        api_key: cli.api_key,
        backend: cli.backend,
    });
    tracing::debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Models => {
            let client = model_client(&config)?;
            let models = client.list_models().await;
            if models.is_empty() {
                bail!("No models available from {}", config.inference.api_base);
            }
            shell::print_models(&models, &mut io::stdout())?;
        }
        Commands::Chat { model } => {
            let client = model_client(&config)?;
            let model = pick_model(&client, &config, model).await?;
            let stdin = io::stdin();
            shell::chat_repl(&client, &model, &mut stdin.lock(), &mut io::stdout()).await?;
        }
        Commands::Summarize { model, dataset } => {
            let client = Arc::new(model_client(&config)?);
            let model = pick_model(&client, &config, model).await?;
            let store = DatasetStore::new(config.storage.clone());
            let dataset = match dataset {
                Some(path) => load_dataset(&path)?,
                None => {
                    let stdin = io::stdin();
                    shell::choose_dataset(&store, &mut stdin.lock(), &mut io::stdout())?
                }
            };

            let summarizer = Summarizer::new(client, &config.pipeline);
            let (path, stats) = summarizer.run(&dataset, &model, &store).await?;
            println!(
                "Summarized {}/{} records ({} failed) into {}",
                stats.generated,
                stats.records,
                stats.failed,
                path.display()
            );
        }
        Commands::Evaluate { input, dataset, model, output_dir } => {
            let mut storage = config.storage.clone();
            if let Some(dir) = output_dir {
                storage.evaluation_dir = dir;
            }
            let store = DatasetStore::new(storage);

            let input = match (input, dataset, model) {
                (Some(input), _, _) => input,
                (None, Some(dataset), Some(model)) => store
                    .latest_summaries(&dataset, &model)?
                    .with_context(|| format!("No summaries found for {} / {}", dataset, model))?,
                _ => bail!("Give a summary file or both --dataset and --model"),
            };

            let evaluator = Evaluator::from_config(&config.metrics)?;
            let (report, path) = evaluate_summaries(&input, &evaluator, &store).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("Report saved to {}", path.display());
        }
        Commands::Import { corpus, name, limit, text_field, reference_field } => {
            let options = ImportOptions { name, limit, text_field, reference_field };
            let dataset = import_jsonl(&corpus, &options)?;
            let store = DatasetStore::new(config.storage.clone());
            let path = store.create_dataset(&dataset)?;
            println!("Imported {} records into {}", dataset.data.len(), path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
