use std::collections::BTreeMap;

use crate::aggregator::Counts;
use crate::error::{BayesError, Result};
use crate::predictor::Predictor;

/// Which rule [`Model::word_log_prob`] applies to a (word, label) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Likelihood {
    /// The word never appeared in any training post.
    Unseen,
    /// The word appeared in training, but never in a post with this label.
    /// Carries the word's document frequency across the whole corpus.
    OtherLabels { document_frequency: u64 },
    /// The word appeared in `count` of the label's `label_posts` posts.
    InLabel { count: u64, label_posts: u64 },
}

/// A trained Naive Bayes model.
///
/// The model is an immutable view over the counters of a finished
/// [`crate::aggregator::TrainingAggregator`]. Log-probabilities are computed
/// on demand from those counters, so every query is a pure function of the
/// training data and the model can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    counts: Counts,
}

impl Model {
    pub(crate) fn from_counts(counts: Counts) -> Self {
        Model { counts }
    }

    pub fn total_posts(&self) -> u64 {
        self.counts.total_posts
    }

    pub fn vocabulary_size(&self) -> usize {
        self.counts.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.label_counts.is_empty()
    }

    /// Returns the trained labels in lexicographic order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.label_counts.keys().map(String::as_str)
    }

    /// Returns the number of training posts with the given label.
    pub fn label_count(&self, label: &str) -> Option<u64> {
        self.counts.label_counts.get(label).copied()
    }

    /// Returns the number of training posts, of any label, containing `word`.
    pub fn document_frequency(&self, word: &str) -> Option<u64> {
        self.counts.vocabulary.get(word).copied()
    }

    /// Returns the number of training posts with `label` that contain `word`.
    pub fn word_count(&self, label: &str, word: &str) -> Option<u64> {
        self.counts
            .word_label_counts
            .get(label)
            .and_then(|words| words.get(word))
            .copied()
    }

    /// Returns every word seen with `label`, with its per-label document
    /// frequency, in lexicographic order.
    ///
    /// # Errors
    /// Returns [`BayesError::UnknownLabel`] if `label` was never trained on.
    pub fn word_counts(&self, label: &str) -> Result<impl Iterator<Item = (&str, u64)> + '_> {
        self.require_label(label)?;
        let words = self.counts.word_label_counts.get(label);
        Ok(words
            .into_iter()
            .flat_map(BTreeMap::iter)
            .map(|(word, &n)| (word.as_str(), n)))
    }

    /// Computes the log-prior of a label.
    ///
    /// `ln(posts with label / total posts)`
    ///
    /// # Errors
    /// Returns [`BayesError::UnknownLabel`] if `label` was never trained on,
    /// and [`BayesError::DivisionDegenerate`] if the model has no posts.
    pub fn log_prior(&self, label: &str) -> Result<f64> {
        let label_posts = self.require_label(label)?;
        let total = self.require_total()?;
        Ok(ln_ratio(label_posts, total))
    }

    /// Decides which likelihood rule applies to `word` under `label`.
    ///
    /// Global absence is tested first, then absence from the label.
    ///
    /// # Errors
    /// Returns [`BayesError::UnknownLabel`] if `label` was never trained on.
    pub fn likelihood(&self, word: &str, label: &str) -> Result<Likelihood> {
        let label_posts = self.require_label(label)?;

        let Some(document_frequency) = self.document_frequency(word) else {
            return Ok(Likelihood::Unseen);
        };
        match self.word_count(label, word) {
            None => Ok(Likelihood::OtherLabels { document_frequency }),
            Some(count) => Ok(Likelihood::InLabel { count, label_posts }),
        }
    }

    /// Computes the log-likelihood of `word` given `label`.
    ///
    /// * word never seen in training: `ln(1 / total posts)`
    /// * word seen, but not with this label: `ln(document frequency / total posts)`
    /// * otherwise: `ln(posts with label containing word / posts with label)`
    ///
    /// The result is finite and non-positive for every word.
    ///
    /// # Errors
    /// Returns [`BayesError::UnknownLabel`] if `label` was never trained on,
    /// and [`BayesError::DivisionDegenerate`] if a denominator is zero.
    pub fn word_log_prob(&self, word: &str, label: &str) -> Result<f64> {
        let likelihood = self.likelihood(word, label)?;
        let total = self.require_total()?;

        match likelihood {
            Likelihood::Unseen => Ok(ln_ratio(1, total)),
            Likelihood::OtherLabels { document_frequency } => Ok(ln_ratio(document_frequency, total)),
            Likelihood::InLabel { count, label_posts } => {
                if label_posts == 0 {
                    return Err(BayesError::DivisionDegenerate {
                        denominator: format!("post count of label `{}`", label),
                    });
                }
                Ok(ln_ratio(count, label_posts))
            }
        }
    }

    /// Returns a [`Predictor`] that classifies posts with this model.
    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(self)
    }

    fn require_label(&self, label: &str) -> Result<u64> {
        self.label_count(label).ok_or_else(|| BayesError::UnknownLabel {
            label: label.to_string(),
        })
    }

    fn require_total(&self) -> Result<u64> {
        match self.counts.total_posts {
            0 => Err(BayesError::DivisionDegenerate {
                denominator: "total post count".to_string(),
            }),
            total => Ok(total),
        }
    }
}

fn ln_ratio(numerator: u64, denominator: u64) -> f64 {
    (numerator as f64 / denominator as f64).ln()
}
