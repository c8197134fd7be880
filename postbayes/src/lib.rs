pub mod aggregator;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod predictor;
pub mod summary;
pub mod tokenizer;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn get_version() -> &'static str {
    VERSION
}
