//! vatkeep-core: pure engine for VAT filing deadline tracking.
//!
//! Everything in this crate is a pure function of its inputs: the caller
//! resolves the wall clock to a calendar date once and passes it down.

pub mod classify;
pub mod client;
pub mod compose;
pub mod error;
pub mod time;

pub use classify::{Bucket, BucketFilter, Classification, classify, filter_by_bucket, is_alert_due};
pub use client::{AlertChannel, ClientRecord, VatPeriod, VatStatus, parse_due_date};
pub use compose::{compose_chat, compose_email, email_subject, format_date};
pub use error::CoreError;
pub use time::today_in_tz;
