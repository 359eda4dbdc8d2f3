pub mod classifier;
pub mod config;
pub mod error;
pub mod error_recovery;
pub mod error_utils;
pub mod lexicon;
pub mod resolver;
pub mod source;
pub mod types;

pub use classifier::{build_corpus, classify, Classifier};
pub use config::AppConfig;
pub use error::*;
pub use error_recovery::*;
pub use error_utils::*;
pub use lexicon::{JsonLexiconStore, KeywordLexicon, LexiconStore};
pub use resolver::{resolve, try_resolve};
pub use source::ChannelSource;
pub use types::*;
