use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::corpus::Post;
use crate::error::Result;
use crate::model::Model;
use crate::predictor::Predictor;

/// The prediction made for one labeled test post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub correct: String,
    pub predicted: String,
    pub score: f64,
    pub content: String,
}

impl TestOutcome {
    pub fn is_correct(&self) -> bool {
        self.correct == self.predicted
    }
}

/// Predictions for a whole test set, in test-set order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub trained_posts: u64,
    pub outcomes: Vec<TestOutcome>,
    pub num_correct: usize,
    pub num_total: usize,
    pub accuracy: f64,
}

/// Evaluator scores a labeled test set against a trained model.
pub struct Evaluator<'a> {
    model: &'a Model,
    predictor: Predictor<'a>,
    num_threads: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates a new instance of [`Evaluator`].
    ///
    /// # Arguments
    /// * `model` - The trained model.
    /// * `num_threads` - Worker threads used to score posts. `0` and `1`
    ///   both score on the calling thread.
    pub fn new(model: &'a Model, num_threads: usize) -> Self {
        Evaluator {
            model,
            predictor: Predictor::new(model),
            num_threads,
        }
    }

    /// Predicts every post and tallies how many predictions match the post's label.
    ///
    /// # Returns
    /// An [`EvaluationReport`] whose outcomes keep the order of `posts`.
    /// Accuracy is `0.0` for an empty test set.
    ///
    /// # Errors
    /// Returns the first prediction error, or
    /// [`crate::error::BayesError::ThreadPool`] if the worker pool cannot be
    /// started.
    pub fn evaluate(&self, posts: Vec<Post>) -> Result<EvaluationReport> {
        let outcomes: Vec<TestOutcome> = if self.num_threads > 1 {
            let pool = ThreadPoolBuilder::new().num_threads(self.num_threads).build()?;
            pool.install(|| {
                posts
                    .into_par_iter()
                    .map(|post| self.outcome(post))
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            posts.into_iter().map(|post| self.outcome(post)).collect::<Result<_>>()?
        };

        let num_total = outcomes.len();
        let num_correct = outcomes.iter().filter(|o| o.is_correct()).count();
        let accuracy = if num_total == 0 {
            0.0
        } else {
            num_correct as f64 / num_total as f64
        };

        tracing::info!(
            num_correct,
            num_total,
            num_threads = self.num_threads,
            "evaluation complete"
        );

        Ok(EvaluationReport {
            trained_posts: self.model.total_posts(),
            outcomes,
            num_correct,
            num_total,
            accuracy,
        })
    }

    fn outcome(&self, post: Post) -> Result<TestOutcome> {
        let prediction = self.predictor.predict(&post.content)?;
        Ok(TestOutcome {
            correct: post.label,
            predicted: prediction.label,
            score: prediction.score,
            content: post.content,
        })
    }
}
