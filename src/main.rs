use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use iris_nn::config::PipelineConfig;
use iris_nn::logging::init_logging;
use iris_nn::pipeline;

/// Train a 4-3-3-3 network on the Iris dataset and print an evaluation report.
///
/// Every flag is optional; with none the classic tutorial run is reproduced.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file with pipeline settings; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory where the dataset is cached
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Use this data file instead of downloading
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    epochs: Option<usize>,
    #[arg(long)]
    learning_rate: Option<f64>,
    /// Write the per-epoch loss history here as JSON
    #[arg(long, value_name = "PATH")]
    history_out: Option<PathBuf>,
}

impl Cli {
    fn pipeline_config(&self) -> iris_nn::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_json(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(file) = &self.data_file {
            config.data_file = Some(file.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(lr) = self.learning_rate {
            config.learning_rate = lr;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.pipeline_config()?;

    let report = pipeline::run(&config, |_| {})?;
    println!("Iris data available at: {}", report.data_path.display());
    println!("{}", report.evaluation.stats());

    if let Some(path) = &cli.history_out {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report.history)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging() {
        eprintln!("could not install logger: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
