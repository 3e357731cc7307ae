//! In-memory reductions behind the dashboards

use std::collections::BTreeMap;

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::Iterable;
use serde::Serialize;

use crate::db::models::ApplicationStatus;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub status: ApplicationStatus,
    pub count: u64,
    pub percentage: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub total: u64,
    pub buckets: Vec<StatusBucket>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub stage: &'static str,
    pub count: u64,
    pub percentage: u8,
}

/// round(100 * count / total), 0 for an empty total
pub fn percentage(count: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 * 100.0) / total as f64).round() as u8
}

fn count_of(counts: &[(ApplicationStatus, i64)], status: ApplicationStatus) -> u64 {
    counts
        .iter()
        .filter(|(s, _)| *s == status)
        .map(|(_, n)| (*n).max(0) as u64)
        .sum()
}

/// Every status, in lifecycle order, with its share of the total
pub fn status_distribution(counts: &[(ApplicationStatus, i64)]) -> StatusDistribution {
    let total: u64 = counts.iter().map(|(_, n)| (*n).max(0) as u64).sum();
    let buckets = ApplicationStatus::iter()
        .map(|status| {
            let count = count_of(counts, status);
            StatusBucket {
                status,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    StatusDistribution { total, buckets }
}

/// Group timestamps by calendar month; keys sort chronologically
pub fn monthly_trend<I>(timestamps: I) -> Vec<MonthBucket>
where
    I: IntoIterator<Item = DateTimeWithTimeZone>,
{
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    for ts in timestamps {
        *months.entry(ts.format("%Y-%m").to_string()).or_default() += 1;
    }
    months
        .into_iter()
        .map(|(month, count)| MonthBucket { month, count })
        .collect()
}

/// Highest counts first; ties broken by key
pub fn top_n<K: Ord>(mut items: Vec<(K, i64)>, n: usize) -> Vec<(K, i64)> {
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items.truncate(n);
    items
}

const FUNNEL: [(&str, ApplicationStatus); 4] = [
    ("REVIEWING", ApplicationStatus::Reviewing),
    ("SHORTLISTED", ApplicationStatus::Shortlisted),
    ("INTERVIEWED", ApplicationStatus::Interviewed),
    ("ACCEPTED", ApplicationStatus::Accepted),
];

/// Position on the hiring line; rejected and withdrawn only ever "applied"
fn progress(status: ApplicationStatus) -> usize {
    match status {
        ApplicationStatus::Reviewing => 1,
        ApplicationStatus::Shortlisted => 2,
        ApplicationStatus::Interviewed => 3,
        ApplicationStatus::Accepted => 4,
        ApplicationStatus::Pending
        | ApplicationStatus::Rejected
        | ApplicationStatus::Withdrawn => 0,
    }
}

/// Cumulative stage counts: an application counts for every stage it reached
pub fn conversion_funnel(counts: &[(ApplicationStatus, i64)]) -> Vec<FunnelStage> {
    let applied: u64 = counts.iter().map(|(_, n)| (*n).max(0) as u64).sum();
    let reached = |stage: usize| -> u64 {
        counts
            .iter()
            .filter(|(s, _)| progress(*s) >= stage)
            .map(|(_, n)| (*n).max(0) as u64)
            .sum()
    };

    let mut stages = vec![FunnelStage {
        stage: "APPLIED",
        count: applied,
        percentage: percentage(applied, applied),
    }];
    stages.extend(FUNNEL.iter().map(|(name, status)| {
        let count = reached(progress(*status));
        FunnelStage {
            stage: *name,
            count,
            percentage: percentage(count, applied),
        }
    }));
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_empty_distribution_is_all_zero() {
        let dist = status_distribution(&[]);
        assert_eq!(dist.total, 0);
        assert_eq!(dist.buckets.len(), 7);
        assert!(dist.buckets.iter().all(|b| b.count == 0 && b.percentage == 0));
    }

    #[test]
    fn test_distribution_rounds() {
        let dist = status_distribution(&[
            (ApplicationStatus::Pending, 1),
            (ApplicationStatus::Reviewing, 2),
        ]);
        assert_eq!(dist.total, 3);
        assert_eq!(dist.buckets[0].percentage, 33);
        assert_eq!(dist.buckets[1].percentage, 67);
    }

    #[test]
    fn test_monthly_trend_sorted() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let stamps = vec![
            tz.with_ymd_and_hms(2024, 11, 3, 0, 0, 0).unwrap(),
            tz.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap(),
            tz.with_ymd_and_hms(2024, 11, 20, 0, 0, 0).unwrap(),
        ];
        let trend = monthly_trend(stamps);
        assert_eq!(
            trend,
            vec![
                MonthBucket { month: "2024-02".into(), count: 1 },
                MonthBucket { month: "2024-11".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_top_n() {
        let top = top_n(vec![("b", 3), ("a", 3), ("c", 9), ("d", 1)], 3);
        assert_eq!(top, vec![("c", 9), ("a", 3), ("b", 3)]);
    }

    #[test]
    fn test_funnel_is_cumulative() {
        let funnel = conversion_funnel(&[
            (ApplicationStatus::Pending, 4),
            (ApplicationStatus::Reviewing, 2),
            (ApplicationStatus::Interviewed, 1),
            (ApplicationStatus::Accepted, 1),
            (ApplicationStatus::Rejected, 2),
        ]);
        let counts: Vec<_> = funnel.iter().map(|s| (s.stage, s.count)).collect();
        assert_eq!(
            counts,
            vec![
                ("APPLIED", 10),
                ("REVIEWING", 4),
                ("SHORTLISTED", 2),
                ("INTERVIEWED", 2),
                ("ACCEPTED", 1),
            ]
        );
        assert_eq!(funnel[0].percentage, 100);
        assert_eq!(funnel[1].percentage, 40);
    }

    #[test]
    fn test_funnel_empty() {
        let funnel = conversion_funnel(&[]);
        assert!(funnel.iter().all(|s| s.count == 0 && s.percentage == 0));
    }
}
