pub mod article_service;
pub mod lexicon;
pub mod sentiment_analyzer;
pub mod statistics_service;
pub mod trend_aggregator;
