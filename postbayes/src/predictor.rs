use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{BayesError, Result};
use crate::model::Model;
use crate::tokenizer::unique_words;

/// The label chosen for a post and its log-probability score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Predictor classifies posts against a trained [`Model`].
///
/// A label's score is its log-prior plus the log-likelihood of every
/// distinct word of the post. The highest score wins. Labels are compared in
/// lexicographic order and a later label only takes over on a strictly
/// greater score, so among equal scores the lexicographically first label is
/// chosen.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    model: &'a Model,
}

impl<'a> Predictor<'a> {
    pub fn new(model: &'a Model) -> Self {
        Predictor { model }
    }

    /// Scores a post under every trained label.
    ///
    /// # Returns
    /// `(label, score)` pairs in lexicographic label order.
    ///
    /// # Errors
    /// Returns [`BayesError::DivisionDegenerate`] if a ratio has a zero
    /// denominator.
    pub fn scores(&self, content: &str) -> Result<Vec<(&'a str, f64)>> {
        self.scores_tokens(&unique_words(content))
    }

    /// Predicts the label of a post.
    ///
    /// # Arguments
    /// * `content` - The post text; it is split into unique words first.
    ///
    /// # Errors
    /// Returns [`BayesError::NoModel`] if the model has no trained labels.
    ///
    /// # Example
    /// ```
    /// use postbayes::aggregator::TrainingAggregator;
    /// use postbayes::corpus::Post;
    ///
    /// let mut aggregator = TrainingAggregator::new();
    /// aggregator
    ///     .train(vec![
    ///         Ok(Post::new("spam", "buy now")),
    ///         Ok(Post::new("ham", "meeting now")),
    ///         Ok(Post::new("spam", "buy buy")),
    ///     ])
    ///     .unwrap();
    /// let model = aggregator.finish();
    ///
    /// let prediction = model.predictor().predict("meeting").unwrap();
    /// assert_eq!(prediction.label, "ham");
    /// ```
    pub fn predict(&self, content: &str) -> Result<Prediction> {
        self.predict_tokens(&unique_words(content))
    }

    /// Predicts the label of a post that has already been split into words.
    ///
    /// # Errors
    /// Same as [`Predictor::predict`].
    pub fn predict_tokens(&self, words: &BTreeSet<&str>) -> Result<Prediction> {
        let mut best: Option<(&str, f64)> = None;
        for (label, score) in self.scores_tokens(words)? {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }

        let (label, score) = best.ok_or(BayesError::NoModel)?;
        tracing::debug!(label, score, num_words = words.len(), "predicted");
        Ok(Prediction {
            label: label.to_string(),
            score,
        })
    }

    fn scores_tokens(&self, words: &BTreeSet<&str>) -> Result<Vec<(&'a str, f64)>> {
        self.model
            .labels()
            .map(|label| -> Result<(&'a str, f64)> {
                let mut score = self.model.log_prior(label)?;
                for word in words {
                    score += self.model.word_log_prob(word, label)?;
                }
                Ok((label, score))
            })
            .collect()
    }
}
