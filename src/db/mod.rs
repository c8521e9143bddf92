pub mod article_queries;
