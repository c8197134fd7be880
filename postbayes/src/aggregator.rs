use std::collections::BTreeMap;

use crate::corpus::Post;
use crate::error::Result;
use crate::model::Model;
use crate::tokenizer::unique_words;

/// Document-frequency counters gathered from a training corpus.
///
/// Every count is a number of posts, never a number of raw occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Counts {
    pub(crate) total_posts: u64,
    pub(crate) label_counts: BTreeMap<String, u64>,
    pub(crate) vocabulary: BTreeMap<String, u64>,
    pub(crate) word_label_counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Counts {
    fn add_post(&mut self, label: &str, content: &str) -> usize {
        self.total_posts += 1;
        bump(&mut self.label_counts, label);

        if !self.word_label_counts.contains_key(label) {
            self.word_label_counts.insert(label.to_string(), BTreeMap::new());
        }
        let words = unique_words(content);
        if let Some(label_words) = self.word_label_counts.get_mut(label) {
            for word in &words {
                bump(label_words, word);
                bump(&mut self.vocabulary, word);
            }
        }
        words.len()
    }

    fn absorb(&mut self, other: Counts) {
        self.total_posts += other.total_posts;
        for (label, n) in other.label_counts {
            *self.label_counts.entry(label).or_default() += n;
        }
        for (word, n) in other.vocabulary {
            *self.vocabulary.entry(word).or_default() += n;
        }
        for (label, words) in other.word_label_counts {
            let label_words = self.word_label_counts.entry(label).or_default();
            for (word, n) in words {
                *label_words.entry(word).or_default() += n;
            }
        }
    }
}

fn bump(map: &mut BTreeMap<String, u64>, key: &str) {
    match map.get_mut(key) {
        Some(n) => *n += 1,
        None => {
            map.insert(key.to_string(), 1);
        }
    }
}

/// TrainingAggregator accumulates the counters a [`Model`] is built from.
///
/// Its lifecycle is: [`TrainingAggregator::new`] creates it empty, one call to
/// [`TrainingAggregator::train`] makes a single forward pass over the corpus,
/// and [`TrainingAggregator::finish`] turns it into a read-only model.
/// Counters only ever grow; [`TrainingAggregator::reset`] is the one way back
/// to the empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingAggregator {
    counts: Counts,
}

impl TrainingAggregator {
    /// Creates a new, empty instance of [`TrainingAggregator`].
    pub fn new() -> Self {
        TrainingAggregator::default()
    }

    /// Trains on a stream of posts in one forward pass.
    ///
    /// Each post counts once towards its label, and each distinct word of the
    /// post counts once towards the global vocabulary and once towards the
    /// label's word counts, however often it is repeated within the post.
    ///
    /// # Arguments
    /// * `rows` - Posts in corpus order, as yielded by a row source such as
    ///   [`crate::corpus::CorpusReader`].
    ///
    /// # Errors
    /// Propagates the first error yielded by `rows`. Training is atomic: when
    /// an error is returned the aggregator is left exactly as it was.
    ///
    /// # Note
    /// Training twice without [`TrainingAggregator::reset`] adds the second
    /// corpus on top of the first.
    pub fn train<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Post>>,
    {
        let mut staged = Counts::default();

        for row in rows {
            let post = row?;
            let num_words = staged.add_post(&post.label, &post.content);
            if num_words == 0 {
                tracing::warn!(
                    record = staged.total_posts,
                    label = %post.label,
                    "training post has no words"
                );
            } else {
                tracing::trace!(record = staged.total_posts, label = %post.label, num_words);
            }
        }

        tracing::info!(
            posts = staged.total_posts,
            labels = staged.label_counts.len(),
            vocabulary = staged.vocabulary.len(),
            "training pass complete"
        );
        self.counts.absorb(staged);
        Ok(())
    }

    /// Clears every counter back to the empty state.
    pub fn reset(&mut self) {
        self.counts = Counts::default();
    }

    /// Returns the total number of posts trained on.
    pub fn total_posts(&self) -> u64 {
        self.counts.total_posts
    }

    /// Returns the number of distinct words seen across all labels.
    pub fn vocabulary_size(&self) -> usize {
        self.counts.vocabulary.len()
    }

    /// Returns the number of posts trained on with the given label.
    pub fn label_count(&self, label: &str) -> Option<u64> {
        self.counts.label_counts.get(label).copied()
    }

    /// Consumes the aggregator and returns the read-only [`Model`] over its counts.
    pub fn finish(self) -> Model {
        Model::from_counts(self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::BayesError;

    fn rows(posts: &[(&str, &str)]) -> Vec<Result<Post>> {
        posts
            .iter()
            .map(|(label, content)| Ok(Post::new(*label, *content)))
            .collect()
    }

    fn worked_example() -> Vec<Result<Post>> {
        rows(&[("spam", "buy now"), ("ham", "meeting now"), ("spam", "buy buy")])
    }

    #[test]
    fn test_train_worked_example() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(worked_example())?;

        let counts = &aggregator.counts;
        assert_eq!(counts.total_posts, 3);
        assert_eq!(counts.label_counts.get("spam"), Some(&2));
        assert_eq!(counts.label_counts.get("ham"), Some(&1));
        assert_eq!(counts.vocabulary.get("buy"), Some(&2));
        assert_eq!(counts.vocabulary.get("now"), Some(&2));
        assert_eq!(counts.vocabulary.get("meeting"), Some(&1));
        assert_eq!(counts.vocabulary.len(), 3);
        assert_eq!(counts.word_label_counts["spam"].get("buy"), Some(&2));
        assert_eq!(counts.word_label_counts["spam"].get("now"), Some(&1));
        assert_eq!(counts.word_label_counts["spam"].get("meeting"), None);
        assert_eq!(counts.word_label_counts["ham"].get("meeting"), Some(&1));
        Ok(())
    }

    #[test]
    fn test_repeated_word_counts_once_per_post() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(rows(&[("a", "x x x x")]))?;

        assert_eq!(aggregator.counts.vocabulary.get("x"), Some(&1));
        assert_eq!(aggregator.counts.word_label_counts["a"].get("x"), Some(&1));
        Ok(())
    }

    #[test]
    fn test_empty_post_still_counts_label() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(rows(&[("quiet", ""), ("loud", "hey")]))?;

        assert_eq!(aggregator.total_posts(), 2);
        assert_eq!(aggregator.label_count("quiet"), Some(1));
        assert!(aggregator.counts.word_label_counts["quiet"].is_empty());
        assert_eq!(aggregator.vocabulary_size(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_train_commits_nothing() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(rows(&[("ham", "lunch")]))?;
        let before = aggregator.clone();

        let mut bad = rows(&[("spam", "buy now")]);
        bad.push(Err(BayesError::MalformedInput {
            record: 2,
            field: "content".to_string(),
        }));
        bad.extend(rows(&[("spam", "never reached")]));

        let err = aggregator.train(bad).err();
        assert!(matches!(err, Some(BayesError::MalformedInput { record: 2, .. })));
        assert_eq!(aggregator, before);
        Ok(())
    }

    #[test]
    fn test_reset_makes_training_repeatable() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(worked_example())?;
        let first = aggregator.clone();

        aggregator.reset();
        assert_eq!(aggregator, TrainingAggregator::new());

        aggregator.train(worked_example())?;
        assert_eq!(aggregator, first);
        Ok(())
    }

    #[test]
    fn test_training_twice_without_reset_doubles() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(worked_example())?;
        aggregator.train(worked_example())?;

        assert_eq!(aggregator.total_posts(), 6);
        assert_eq!(aggregator.label_count("spam"), Some(4));
        assert_eq!(aggregator.counts.vocabulary.get("buy"), Some(&4));
        Ok(())
    }

    #[test]
    fn test_label_counts_sum_to_total() -> Result<()> {
        let mut aggregator = TrainingAggregator::new();
        aggregator.train(rows(&[
            ("a", "one two"),
            ("b", "two three"),
            ("c", ""),
            ("a", "three"),
            ("b", "one one"),
        ]))?;

        let sum: u64 = aggregator.counts.label_counts.values().sum();
        assert_eq!(sum, aggregator.total_posts());

        for (word, &df) in &aggregator.counts.vocabulary {
            let per_label: u64 = aggregator
                .counts
                .word_label_counts
                .values()
                .filter_map(|words| words.get(word))
                .sum();
            assert_eq!(per_label, df);
        }
        Ok(())
    }
}
