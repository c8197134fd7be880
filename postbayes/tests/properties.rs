use postbayes::aggregator::TrainingAggregator;
use postbayes::corpus::Post;
use postbayes::model::Model;
use proptest::prelude::*;

fn corpus() -> impl Strategy<Value = Vec<(String, String)>> {
    let label = prop::sample::select(vec!["ham", "spam", "eggs", "Ham"]);
    let word = prop::sample::select(vec!["a", "b", "c", "d", "A", "b!", "eecs"]);
    let content = prop::collection::vec(word, 0..8).prop_map(|words| words.join(" "));
    prop::collection::vec((label.prop_map(String::from), content), 1..30)
}

fn query() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec!["a", "c", "A", "zzz", "b!", "novel", "eecs"]);
    prop::collection::vec(word, 0..6).prop_map(|words| words.join(" "))
}

fn train(rows: &[(String, String)]) -> Model {
    let mut aggregator = TrainingAggregator::new();
    aggregator
        .train(rows.iter().map(|(label, content)| Ok(Post::new(label.as_str(), content.as_str()))))
        .expect("Failed to train");
    aggregator.finish()
}

proptest! {
    #[test]
    fn label_counts_sum_to_total(rows in corpus()) {
        let model = train(&rows);
        let sum: u64 = model.labels().filter_map(|l| model.label_count(l)).sum();
        prop_assert_eq!(sum, model.total_posts());
        prop_assert_eq!(model.total_posts(), rows.len() as u64);
    }

    #[test]
    fn log_prior_is_ln_of_relative_frequency(rows in corpus()) {
        let model = train(&rows);
        for label in model.labels() {
            let count = model.label_count(label).unwrap_or_default() as f64;
            let expected = (count / model.total_posts() as f64).ln();
            let prior = model.log_prior(label).unwrap();
            prop_assert!(prior <= 0.0);
            prop_assert!((prior - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn in_label_likelihood_uses_label_counts(rows in corpus()) {
        let model = train(&rows);
        for label in model.labels() {
            let label_posts = model.label_count(label).unwrap_or_default();
            for (word, count) in model.word_counts(label).unwrap() {
                prop_assert!(count <= label_posts);
                let expected = (count as f64 / label_posts as f64).ln();
                prop_assert!((model.word_log_prob(word, label).unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn word_log_prob_is_finite_and_non_positive(rows in corpus(), q in query()) {
        let model = train(&rows);
        for label in model.labels() {
            for word in q.split_whitespace() {
                let p = model.word_log_prob(word, label).unwrap();
                prop_assert!(p.is_finite());
                prop_assert!(p <= 0.0);
            }
        }
    }

    #[test]
    fn empty_post_scores_the_max_prior(rows in corpus()) {
        let model = train(&rows);
        let prediction = model.predictor().predict("").unwrap();

        let mut best: Option<(&str, f64)> = None;
        for label in model.labels() {
            let prior = model.log_prior(label).unwrap();
            if best.map_or(true, |(_, b)| prior > b) {
                best = Some((label, prior));
            }
        }
        let (label, prior) = best.unwrap();
        prop_assert_eq!(prediction.label.as_str(), label);
        prop_assert_eq!(prediction.score, prior);
    }

    #[test]
    fn prediction_is_the_first_maximum(rows in corpus(), q in query()) {
        let model = train(&rows);
        let predictor = model.predictor();
        let scores = predictor.scores(&q).unwrap();
        let prediction = predictor.predict(&q).unwrap();

        let max = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
        let first = scores.iter().find(|(_, s)| *s == max).map(|(l, _)| *l);
        prop_assert_eq!(Some(prediction.label.as_str()), first);
    }

    #[test]
    fn retraining_after_reset_is_idempotent(rows in corpus(), q in query()) {
        let mut aggregator = TrainingAggregator::new();
        let posts = || rows.iter().map(|(l, c)| Ok(Post::new(l.as_str(), c.as_str())));

        aggregator.train(posts()).unwrap();
        let first = aggregator.clone().finish();
        aggregator.reset();
        aggregator.train(posts()).unwrap();
        let second = aggregator.finish();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first.predictor().predict(&q).unwrap(),
            second.predictor().predict(&q).unwrap()
        );
    }
}
