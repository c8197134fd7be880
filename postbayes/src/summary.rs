use serde::Serialize;

use crate::error::Result;
use crate::model::Model;

/// A trained label, with its post count and log-prior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub posts: u64,
    pub log_prior: f64,
}

/// A word seen with a label, with its per-label document frequency and
/// log-likelihood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSummary {
    pub label: String,
    pub word: String,
    pub count: u64,
    pub log_likelihood: f64,
}

/// Snapshot of a trained model's parameters, for reporting.
///
/// Labels, and words within a label, are in lexicographic order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub total_posts: u64,
    pub vocabulary_size: usize,
    pub labels: Vec<LabelSummary>,
    pub words: Vec<WordSummary>,
}

impl TrainingSummary {
    /// Collects the parameters of `model`.
    ///
    /// # Errors
    /// Returns an error if a log-probability cannot be computed, which only
    /// happens for a model that was never trained consistently.
    pub fn from_model(model: &Model) -> Result<Self> {
        let mut labels = Vec::new();
        let mut words = Vec::new();

        for label in model.labels() {
            labels.push(LabelSummary {
                label: label.to_string(),
                posts: model.label_count(label).unwrap_or_default(),
                log_prior: model.log_prior(label)?,
            });
            for (word, count) in model.word_counts(label)? {
                words.push(WordSummary {
                    label: label.to_string(),
                    word: word.to_string(),
                    count,
                    log_likelihood: model.word_log_prob(word, label)?,
                });
            }
        }

        Ok(TrainingSummary {
            total_posts: model.total_posts(),
            vocabulary_size: model.vocabulary_size(),
            labels,
            words,
        })
    }
}
