use std::io::{self, Write};

use serde::Serialize;

use postbayes::corpus::Post;
use postbayes::evaluation::EvaluationReport;
use postbayes::summary::TrainingSummary;

/// Training-only output: the training posts and the learned parameters.
#[derive(Debug, Serialize)]
pub struct TrainingReport {
    pub training_data: Vec<Post>,
    pub summary: TrainingSummary,
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    Training(TrainingReport),
    Evaluation(EvaluationReport),
}

impl Report {
    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Report::Training(report) => write_training(writer, report),
            Report::Evaluation(report) => write_evaluation(writer, report),
        }
    }
}

fn write_training<W: Write>(w: &mut W, report: &TrainingReport) -> io::Result<()> {
    let summary = &report.summary;

    writeln!(w, "training data:")?;
    for post in &report.training_data {
        writeln!(w, "  label = {}, content = {}", post.label, post.content)?;
    }
    writeln!(w, "trained on {} examples", summary.total_posts)?;
    writeln!(w, "vocabulary size = {}", summary.vocabulary_size)?;
    writeln!(w)?;

    writeln!(w, "classes:")?;
    for label in &summary.labels {
        writeln!(
            w,
            "  {}, {} examples, log-prior = {:.3}",
            label.label, label.posts, label.log_prior
        )?;
    }

    writeln!(w, "classifier parameters:")?;
    for word in &summary.words {
        writeln!(
            w,
            "  {}:{}, count = {}, log-likelihood = {:.3}",
            word.label, word.word, word.count, word.log_likelihood
        )?;
    }
    writeln!(w)
}

fn write_evaluation<W: Write>(w: &mut W, report: &EvaluationReport) -> io::Result<()> {
    writeln!(w, "trained on {} examples", report.trained_posts)?;
    writeln!(w)?;

    writeln!(w, "test data:")?;
    for outcome in &report.outcomes {
        writeln!(
            w,
            "  correct = {}, predicted = {}, log-probability score = {:.3}",
            outcome.correct, outcome.predicted, outcome.score
        )?;
        writeln!(w, "  content = {}", outcome.content)?;
        writeln!(w)?;
    }

    writeln!(
        w,
        "performance: {} / {} posts predicted correctly",
        report.num_correct, report.num_total
    )
}
