//! Temporal classifier: urgency buckets and alert-due decisions.
//!
//! Everything here is a pure function of the record and an injected `today`.
//! Callers resolve the wall clock to a calendar date exactly once (see
//! [`crate::time::today_in_tz`]) so a record's bucket is constant for the
//! whole calendar day, regardless of what hour it is evaluated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ClientRecord;

/// How soon a due date falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Overdue,
    Urgent,
    Upcoming,
    Normal,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Overdue => "overdue",
            Bucket::Urgent => "urgent",
            Bucket::Upcoming => "upcoming",
            Bucket::Normal => "normal",
        }
    }
}

/// A bucket paired with its day count: days overdue for [`Bucket::Overdue`],
/// days remaining otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub bucket: Bucket,
    pub day_count: u32,
}

const URGENT_WITHIN_DAYS: i64 = 7;
const UPCOMING_WITHIN_DAYS: i64 = 30;

/// Classify a due date against today. First match wins:
/// past → overdue, within 7 days → urgent, within 30 → upcoming,
/// anything further out → normal.
pub fn classify(due: NaiveDate, today: NaiveDate) -> Classification {
    let diff = (due - today).num_days();

    if diff < 0 {
        Classification {
            bucket: Bucket::Overdue,
            day_count: diff.unsigned_abs() as u32,
        }
    } else if diff <= URGENT_WITHIN_DAYS {
        Classification {
            bucket: Bucket::Urgent,
            day_count: diff as u32,
        }
    } else if diff <= UPCOMING_WITHIN_DAYS {
        Classification {
            bucket: Bucket::Upcoming,
            day_count: diff as u32,
        }
    } else {
        Classification {
            bucket: Bucket::Normal,
            day_count: diff as u32,
        }
    }
}

/// Whether a reminder is due for this record right now.
///
/// Strict on the far edge: once the due date itself has arrived the alert is
/// no longer "due" — the record surfaces as overdue instead.
pub fn is_alert_due(record: &ClientRecord, today: NaiveDate) -> bool {
    if !record.alerts_enabled {
        return false;
    }

    let due = record.next_due_date;
    let alert_date = due - chrono::Duration::days(record.alert_lead_days as i64);
    today >= alert_date && due > today
}

/// Filter selection for client listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketFilter {
    All,
    Urgent,
    Upcoming,
    AlertsPending,
}

impl BucketFilter {
    /// Whether a record passes this filter today. Buckets are re-derived on
    /// every call; they are never cached on records because due dates are
    /// relative to the wall clock and records are long-lived.
    pub fn matches(&self, record: &ClientRecord, today: NaiveDate) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Urgent => classify(record.next_due_date, today).bucket == Bucket::Urgent,
            BucketFilter::Upcoming => {
                classify(record.next_due_date, today).bucket == Bucket::Upcoming
            }
            BucketFilter::AlertsPending => is_alert_due(record, today),
        }
    }
}

/// Keep the records matching `filter`, preserving input order.
pub fn filter_by_bucket<'a>(
    records: &'a [ClientRecord],
    filter: BucketFilter,
    today: NaiveDate,
) -> Vec<&'a ClientRecord> {
    records.iter().filter(|r| filter.matches(r, today)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(company: &str, due: NaiveDate) -> ClientRecord {
        ClientRecord::new(company, due)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bucket_boundaries() {
        let today = day(2024, 2, 10);

        assert_eq!(classify(today, today).bucket, Bucket::Urgent);
        assert_eq!(classify(today, today).day_count, 0);

        let c = classify(today + Duration::days(7), today);
        assert_eq!(c.bucket, Bucket::Urgent);
        assert_eq!(c.day_count, 7);

        assert_eq!(classify(today + Duration::days(8), today).bucket, Bucket::Upcoming);
        assert_eq!(classify(today + Duration::days(30), today).bucket, Bucket::Upcoming);
        assert_eq!(classify(today + Duration::days(31), today).bucket, Bucket::Normal);
    }

    #[test]
    fn overdue_counts_days_late() {
        let today = day(2024, 2, 10);
        let c = classify(today - Duration::days(3), today);
        assert_eq!(c.bucket, Bucket::Overdue);
        assert_eq!(c.day_count, 3);
    }

    #[test]
    fn buckets_stable_across_month_boundary() {
        let c = classify(day(2024, 3, 2), day(2024, 2, 28));
        assert_eq!(c.bucket, Bucket::Urgent);
        assert_eq!(c.day_count, 3); // 2024 is a leap year
    }

    #[test]
    fn alert_due_window() {
        let today = day(2024, 2, 10);

        let r = record("Acme", today + Duration::days(5));
        assert!(is_alert_due(&r, today));

        let r = record("Acme", today + Duration::days(10));
        assert!(!is_alert_due(&r, today));

        // Already overdue: no longer an alert, the store surfaces it as overdue.
        let r = record("Acme", today - Duration::days(1));
        assert!(!is_alert_due(&r, today));

        // Due today: strict boundary, dueDate > today fails.
        let r = record("Acme", today);
        assert!(!is_alert_due(&r, today));
    }

    #[test]
    fn disabled_alerts_never_due() {
        let today = day(2024, 2, 10);
        let mut r = record("Acme", today + Duration::days(5));
        r.alerts_enabled = false;
        assert!(!is_alert_due(&r, today));
    }

    #[test]
    fn filter_all_is_identity() {
        let today = day(2024, 2, 10);
        let records = vec![
            record("A", today + Duration::days(2)),
            record("B", today + Duration::days(20)),
            record("C", today - Duration::days(2)),
        ];

        let out = filter_by_bucket(&records, BucketFilter::All, today);
        assert_eq!(out.len(), 3);
        let names: Vec<_> = out.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn filter_rederives_buckets() {
        let today = day(2024, 2, 10);
        let records = vec![
            record("A", today + Duration::days(2)),
            record("B", today + Duration::days(20)),
            record("C", today - Duration::days(2)),
        ];

        let urgent = filter_by_bucket(&records, BucketFilter::Urgent, today);
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].company_name, "A");

        // Same records, three weeks later: B is urgent now.
        let later = today + Duration::days(18);
        let urgent = filter_by_bucket(&records, BucketFilter::Urgent, later);
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].company_name, "B");
    }

    #[test]
    fn filter_alerts_pending() {
        let today = day(2024, 2, 10);
        let mut records = vec![
            record("A", today + Duration::days(5)),
            record("B", today + Duration::days(5)),
        ];
        records[1].alerts_enabled = false;

        let pending = filter_by_bucket(&records, BucketFilter::AlertsPending, today);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].company_name, "A");
    }
}
