use std::collections::BTreeSet;

/// Splits a post into the set of its unique whitespace-delimited words.
///
/// Words are kept exactly as written: no case folding, no punctuation
/// stripping. The set iterates in lexicographic order.
///
/// # Arguments
/// * `text` - The post content to split.
///
/// # Returns
/// The unique words of `text`; empty when `text` holds only whitespace.
///
/// # Example
/// ```
/// use postbayes::tokenizer::unique_words;
///
/// let words = unique_words("buy buy now");
/// assert_eq!(words.into_iter().collect::<Vec<_>>(), vec!["buy", "now"]);
/// ```
pub fn unique_words(text: &str) -> BTreeSet<&str> {
    text.split_whitespace().collect()
}
