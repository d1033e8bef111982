pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod tagger;
