use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::models::{
    Article, PeriodTotals, SentimentCounts, SentimentLabel, SentimentTrends, TrendBucket,
    TrendPeriod, TrendPoint,
};

pub const HOURLY_BUCKETS: usize = 24;
pub const WEEK_BUCKETS: usize = 7;
pub const FORTNIGHT_BUCKETS: usize = 14;

/// Start instants of the three trend windows, all relative to one `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindows {
    /// Floor hour of `now` minus 23 hours
    pub last24_start: DateTime<Utc>,
    pub start7_days: NaiveDate,
    pub start14_days: NaiveDate,
}

impl TrendWindows {
    pub fn at(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            last24_start: floor_hour(now) - Duration::hours(HOURLY_BUCKETS as i64 - 1),
            start7_days: today - Duration::days(WEEK_BUCKETS as i64 - 1),
            start14_days: today - Duration::days(FORTNIGHT_BUCKETS as i64 - 1),
        }
    }

    /// Lower bound for fetching input: the widest window's first midnight
    pub fn earliest(&self) -> DateTime<Utc> {
        start_of_day(self.start14_days)
    }
}

impl From<&Article> for TrendPoint {
    fn from(article: &Article) -> Self {
        TrendPoint {
            published_date: article.published_date,
            sentiment_label: Some(article.sentiment_label.clone()),
        }
    }
}

/// Roll per-article labels into 24 hourly, 7 daily and 14 daily buckets.
///
/// Points outside a window are ignored by that window. The 7-day and 14-day series are
/// indexed independently, so an article usually lands in both.
pub fn build_trends(points: &[TrendPoint], now: DateTime<Utc>) -> SentimentTrends {
    let windows = TrendWindows::at(now);

    let mut hourly = [SentimentCounts::default(); HOURLY_BUCKETS];
    let mut week = [SentimentCounts::default(); WEEK_BUCKETS];
    let mut fortnight = [SentimentCounts::default(); FORTNIGHT_BUCKETS];

    for point in points {
        let label = SentimentLabel::normalize(point.sentiment_label.as_deref());

        if point.published_date >= windows.last24_start {
            let hour_index = (point.published_date - windows.last24_start)
                .num_seconds()
                .div_euclid(3600);
            if let Some(bucket) = bucket_at(&mut hourly, hour_index) {
                bucket.record(label);
            }
        }

        let published_day = point.published_date.date_naive();

        let day_index14 = (published_day - windows.start14_days).num_days();
        if let Some(bucket) = bucket_at(&mut fortnight, day_index14) {
            bucket.record(label);
        }

        let day_index7 = (published_day - windows.start7_days).num_days();
        if let Some(bucket) = bucket_at(&mut week, day_index7) {
            bucket.record(label);
        }
    }

    SentimentTrends {
        last24_hours: hourly
            .iter()
            .enumerate()
            .map(|(i, counts)| {
                let start = windows.last24_start + Duration::hours(i as i64);
                to_bucket(start, start.format("%H:%M").to_string(), counts)
            })
            .collect(),
        last7_days: daily_buckets(windows.start7_days, &week),
        last14_days: daily_buckets(windows.start14_days, &fortnight),
    }
}

/// Totals for the summary panel's selected window.
///
/// A series without buckets falls back to the corpus-wide counts rather than zero.
pub fn period_totals(
    trends: &SentimentTrends,
    period: TrendPeriod,
    corpus: &SentimentCounts,
) -> PeriodTotals {
    let series = match period {
        TrendPeriod::Last24Hours => &trends.last24_hours,
        TrendPeriod::Last7Days => &trends.last7_days,
        TrendPeriod::Last14Days => &trends.last14_days,
    };

    let counts = if series.is_empty() {
        *corpus
    } else {
        series.iter().fold(SentimentCounts::default(), |mut acc, bucket| {
            acc.positive += bucket.positive;
            acc.neutral += bucket.neutral;
            acc.negative += bucket.negative;
            acc
        })
    };

    PeriodTotals {
        period,
        positive: counts.positive,
        neutral: counts.neutral,
        negative: counts.negative,
        total: counts.total(),
    }
}

fn bucket_at(buckets: &mut [SentimentCounts], index: i64) -> Option<&mut SentimentCounts> {
    usize::try_from(index).ok().and_then(|i| buckets.get_mut(i))
}

fn daily_buckets(start: NaiveDate, counts: &[SentimentCounts]) -> Vec<TrendBucket> {
    counts
        .iter()
        .enumerate()
        .map(|(i, counts)| {
            let day = start + Duration::days(i as i64);
            to_bucket(start_of_day(day), day.format("%b %d").to_string(), counts)
        })
        .collect()
}

fn to_bucket(period_start: DateTime<Utc>, label: String, counts: &SentimentCounts) -> TrendBucket {
    TrendBucket {
        period_start,
        label,
        positive: counts.positive,
        neutral: counts.neutral,
        negative: counts.negative,
        total: counts.total(),
    }
}

fn floor_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive()
        .and_hms_opt(at.hour(), 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(at)
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 14, 35, 12).unwrap()
    }

    fn point(published: DateTime<Utc>, label: &str) -> TrendPoint {
        TrendPoint {
            published_date: published,
            sentiment_label: Some(label.to_string()),
        }
    }

    fn sum(series: &[TrendBucket]) -> SentimentCounts {
        let mut counts = SentimentCounts::default();
        for bucket in series {
            counts.add(SentimentLabel::Positive, bucket.positive);
            counts.add(SentimentLabel::Neutral, bucket.neutral);
            counts.add(SentimentLabel::Negative, bucket.negative);
        }
        counts
    }

    #[test]
    fn test_windows() {
        let windows = TrendWindows::at(now());
        assert_eq!(windows.last24_start, Utc.with_ymd_and_hms(2026, 10, 15, 15, 0, 0).unwrap());
        assert_eq!(windows.start7_days, NaiveDate::from_ymd_opt(2026, 10, 10).unwrap());
        assert_eq!(windows.start14_days, NaiveDate::from_ymd_opt(2026, 10, 3).unwrap());
        assert_eq!(windows.earliest(), Utc.with_ymd_and_hms(2026, 10, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_input_yields_zero_series() {
        let trends = build_trends(&[], now());
        assert_eq!(trends.last24_hours.len(), 24);
        assert_eq!(trends.last7_days.len(), 7);
        assert_eq!(trends.last14_days.len(), 14);

        let all = trends
            .last24_hours
            .iter()
            .chain(&trends.last7_days)
            .chain(&trends.last14_days);
        for bucket in all {
            assert_eq!(bucket.total, 0);
            assert_eq!(bucket.positive + bucket.neutral + bucket.negative, 0);
        }
    }

    #[test]
    fn test_bucket_labels_and_order() {
        let trends = build_trends(&[], now());

        assert_eq!(trends.last24_hours[0].label, "15:00");
        assert_eq!(trends.last24_hours[23].label, "14:00");
        assert_eq!(
            trends.last24_hours[23].period_start,
            Utc.with_ymd_and_hms(2026, 10, 16, 14, 0, 0).unwrap()
        );
        assert_eq!(trends.last7_days[0].label, "Oct 10");
        assert_eq!(trends.last7_days[6].label, "Oct 16");
        assert_eq!(trends.last14_days[0].label, "Oct 03");

        for series in [&trends.last24_hours, &trends.last7_days, &trends.last14_days] {
            assert!(series.windows(2).all(|w| w[0].period_start < w[1].period_start));
        }

        let json = serde_json::to_value(&trends.last7_days[6]).unwrap();
        assert_eq!(json["periodStart"], "2026-10-16T00:00:00Z");
    }

    #[test]
    fn test_article_at_now_lands_in_last_buckets() {
        let trends = build_trends(&[point(now(), "positive")], now());
        assert_eq!(trends.last24_hours[23].positive, 1);
        assert_eq!(trends.last7_days[6].positive, 1);
        assert_eq!(trends.last14_days[13].positive, 1);
        assert_eq!(sum(&trends.last24_hours).total(), 1);
    }

    #[test]
    fn test_first_hour_boundary() {
        let windows = TrendWindows::at(now());
        let points = vec![
            point(windows.last24_start, "negative"),
            point(windows.last24_start - Duration::seconds(1), "negative"),
        ];
        let trends = build_trends(&points, now());
        assert_eq!(trends.last24_hours[0].negative, 1);
        assert_eq!(sum(&trends.last24_hours).total(), 1);
    }

    #[test]
    fn test_label_normalization() {
        let points = vec![
            point(now(), "POSITIVE"),
            point(now(), "Positive"),
            point(now(), "positive"),
            point(now(), "mixed"),
            TrendPoint {
                published_date: now(),
                sentiment_label: None,
            },
        ];
        let trends = build_trends(&points, now());
        let last = &trends.last14_days[13];
        assert_eq!(last.positive, 3);
        assert_eq!(last.neutral, 2);
        assert_eq!(last.negative, 0);
        assert_eq!(last.total, 5);
    }

    #[test]
    fn test_daily_window_edges() {
        let start14 = Utc.with_ymd_and_hms(2026, 10, 3, 0, 0, 0).unwrap();
        let points = vec![
            point(start14, "negative"),
            point(start14 - Duration::seconds(1), "negative"),
            point(Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0).unwrap(), "positive"),
            point(Utc.with_ymd_and_hms(2026, 10, 9, 23, 59, 59).unwrap(), "positive"),
        ];
        let trends = build_trends(&points, now());

        assert_eq!(trends.last14_days[0].negative, 1);
        assert_eq!(sum(&trends.last14_days).total(), 3);
        assert_eq!(trends.last7_days[0].positive, 1);
        assert_eq!(sum(&trends.last7_days).total(), 1);
        assert_eq!(sum(&trends.last24_hours).total(), 0);
    }

    #[test]
    fn test_fortnight_sums_match_window_counts() {
        let labels = ["positive", "neutral", "negative", "Negative", "unknown"];
        let points: Vec<TrendPoint> = (0..200)
            .map(|i| {
                let published = now() - Duration::minutes(i * 113);
                point(published, labels[i as usize % labels.len()])
            })
            .collect();

        let trends = build_trends(&points, now());
        let windows = TrendWindows::at(now());

        let mut expected = SentimentCounts::default();
        for p in points.iter().filter(|p| p.published_date >= windows.earliest() && p.published_date <= now()) {
            expected.record(SentimentLabel::normalize(p.sentiment_label.as_deref()));
        }

        assert_eq!(sum(&trends.last14_days), expected);
    }

    #[test]
    fn test_week_and_fortnight_are_counted_independently() {
        let points = vec![point(now() - Duration::days(2), "positive")];
        let trends = build_trends(&points, now());
        assert_eq!(sum(&trends.last7_days).positive, 1);
        assert_eq!(sum(&trends.last14_days).positive, 1);
        assert_eq!(trends.last7_days[4].positive, 1);
        assert_eq!(trends.last14_days[11].positive, 1);
    }

    #[test]
    fn test_period_totals_sum_selected_series() {
        let points = vec![
            point(now(), "positive"),
            point(now() - Duration::days(3), "negative"),
            point(now() - Duration::days(10), "neutral"),
        ];
        let trends = build_trends(&points, now());
        let corpus = SentimentCounts { positive: 40, neutral: 40, negative: 40 };

        let day = period_totals(&trends, TrendPeriod::Last24Hours, &corpus);
        assert_eq!((day.positive, day.neutral, day.negative, day.total), (1, 0, 0, 1));

        let week = period_totals(&trends, TrendPeriod::Last7Days, &corpus);
        assert_eq!(week.total, 2);

        let fortnight = period_totals(&trends, TrendPeriod::Last14Days, &corpus);
        assert_eq!(fortnight.total, 3);
    }

    #[test]
    fn test_period_totals_fall_back_to_corpus_when_series_missing() {
        let trends = SentimentTrends {
            last24_hours: vec![],
            last7_days: vec![],
            last14_days: vec![],
        };
        let corpus = SentimentCounts { positive: 5, neutral: 3, negative: 2 };

        let totals = period_totals(&trends, TrendPeriod::Last7Days, &corpus);
        assert_eq!(totals.positive, 5);
        assert_eq!(totals.neutral, 3);
        assert_eq!(totals.negative, 2);
        assert_eq!(totals.total, 10);
    }
}
