use std::path::PathBuf;
use std::process::ExitCode;

use log::error;
use malstm::config::Config;
use malstm::ml::MeanEmbeddingManhattan;
use malstm::prediction::{prepare_prediction, show_prediction_model};

const USAGE: &str = "usage: malstm <prediction.csv> [config.json]";

fn run() -> malstm::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(csv_path) = args.next().map(PathBuf::from) else {
        eprintln!("{}", USAGE);
        return Err(malstm::Error::InvalidConfig(String::from("missing prediction csv")));
    };
    let config = match args.next() {
        Some(path) => Config::from_file(&PathBuf::from(path))?,
        None => Config::from_env()?,
    };
    let prepared = prepare_prediction(&csv_path, &config)?;
    let model = MeanEmbeddingManhattan::new(prepared.encoded.embeddings);
    let scores = show_prediction_model(&model, &prepared.padded)?;
    for (row, score) in prepared.dataset.rows().iter().zip(scores.iter()) {
        println!("{:.6}\t{}\t{}", score, row.phrase1, row.phrase2);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
