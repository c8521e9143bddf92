mod article;
mod sentiment;
mod statistics;

pub use article::{
    Article, ArticleQuery, BatchImportResult, CreateArticle, ReanalysisSummary, UpdateArticle,
    DEFAULT_CATEGORY, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use sentiment::{AnalyzeRequest, SentimentCounts, SentimentLabel, SentimentResult, SentimentTerms};
pub use statistics::{
    PeriodTotals, SentimentTrends, StatisticsResponse, SummaryQueryParams, TrendBucket,
    TrendPeriod, TrendPoint,
};
