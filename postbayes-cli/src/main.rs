mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postbayes::aggregator::TrainingAggregator;
use postbayes::corpus::{read_posts, CorpusReader, DEFAULT_CONTENT_COLUMN, DEFAULT_LABEL_COLUMN};
use postbayes::error::BayesError;
use postbayes::evaluation::Evaluator;
use postbayes::get_version;
use postbayes::summary::TrainingSummary;

use crate::report::{Report, TrainingReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[clap(
    name = "postbayes",
    author,
    about = "Train a Naive Bayes post classifier and optionally evaluate it on test posts",
    version = get_version(),
)]
struct CommandArgs {
    /// Worker threads used to score the test posts.
    #[arg(short = 'n', long, default_value = "1")]
    threads: usize,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// CSV header of the label column.
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,

    /// CSV header of the content column.
    #[arg(long, default_value = DEFAULT_CONTENT_COLUMN)]
    content_column: String,

    train_file: PathBuf,
    test_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Bayes(#[from] BayesError),

    #[error("failed to render report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("POSTBAYES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn build_report(args: &CommandArgs) -> Result<Report, CliError> {
    let corpus =
        CorpusReader::from_path_with_columns(&args.train_file, &args.label_column, &args.content_column)?;
    let mut aggregator = TrainingAggregator::new();
    aggregator.train(corpus)?;
    let model = aggregator.finish();
    tracing::info!(
        train_file = %args.train_file.display(),
        labels = model.labels().count(),
        "model trained"
    );

    match &args.test_file {
        None => {
            let training_data = read_posts(&args.train_file, &args.label_column, &args.content_column)?;
            let summary = TrainingSummary::from_model(&model)?;
            Ok(Report::Training(TrainingReport {
                training_data,
                summary,
            }))
        }
        Some(test_file) => {
            let posts = read_posts(test_file, &args.label_column, &args.content_column)?;
            let evaluation = Evaluator::new(&model, args.threads).evaluate(posts)?;
            Ok(Report::Evaluation(evaluation))
        }
    }
}

fn run() -> Result<(), CliError> {
    let args = CommandArgs::try_parse()?;
    init_tracing();

    // Nothing reaches stdout until the whole report has been computed.
    let report = build_report(&args)?;

    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());
    match args.format {
        Format::Text => report.write_text(&mut writer)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        // --help and --version
        Err(CliError::Usage(e)) if !e.use_stderr() => e.exit(),
        Err(CliError::Usage(e)) => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
