//! Client record model.
//!
//! Records are owned by the store layer; the engine only reads them. We keep
//! this small + serializable, with wire-compatible field defaults so blobs
//! written by older builds (or hand-edited JSON) still load.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatPeriod {
    Monthly,
    #[default]
    Quarterly,
    Annually,
}

impl VatPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            VatPeriod::Monthly => "monthly",
            VatPeriod::Quarterly => "quarterly",
            VatPeriod::Annually => "annually",
        }
    }
}

impl FromStr for VatPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(VatPeriod::Monthly),
            "quarterly" => Ok(VatPeriod::Quarterly),
            "annually" | "annual" => Ok(VatPeriod::Annually),
            other => Err(format!("unknown VAT period: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatStatus {
    #[default]
    NotSubmitted,
    Submitted,
    Paid,
}

impl VatStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VatStatus::NotSubmitted => "not submitted",
            VatStatus::Submitted => "submitted",
            VatStatus::Paid => "paid",
        }
    }
}

impl FromStr for VatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not-submitted" | "not_submitted" => Ok(VatStatus::NotSubmitted),
            "submitted" => Ok(VatStatus::Submitted),
            "paid" => Ok(VatStatus::Paid),
            other => Err(format!("unknown VAT status: {other}")),
        }
    }
}

/// Which channel(s) a client has opted into for reminders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertChannel {
    Email,
    Whatsapp,
    #[default]
    Both,
}

impl AlertChannel {
    pub fn label(&self) -> &'static str {
        match self {
            AlertChannel::Email => "email",
            AlertChannel::Whatsapp => "whatsapp",
            AlertChannel::Both => "both",
        }
    }
}

impl FromStr for AlertChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(AlertChannel::Email),
            "whatsapp" => Ok(AlertChannel::Whatsapp),
            "both" => Ok(AlertChannel::Both),
            other => Err(format!("unknown alert channel: {other}")),
        }
    }
}

/// One tracked business client with a filing due date and alert settings.
///
/// `id` and `created_at` are assigned by the store at creation and never
/// change afterwards. `company_name` and `next_due_date` are always present;
/// everything else defaults to empty/sensible values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub company_name: String,
    pub next_due_date: NaiveDate,

    #[serde(default)]
    pub vat_number: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub vat_period: VatPeriod,
    #[serde(default)]
    pub vat_status: VatStatus,

    #[serde(default = "default_true")]
    pub alerts_enabled: bool,
    /// Days before the due date at which a reminder becomes due. Older blobs
    /// stored this as a free-form string; anything unparsable means 7.
    #[serde(default = "default_lead_days", deserialize_with = "lead_days_compat")]
    pub alert_lead_days: u32,
    #[serde(default)]
    pub alert_channel: AlertChannel,
    #[serde(default)]
    pub alert_email: String,
    #[serde(default)]
    pub alert_whatsapp: String,

    pub created_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Build a draft record. The store assigns the real `id` and `created_at`
    /// when the draft is added; until then they hold placeholder values.
    pub fn new(company_name: impl Into<String>, next_due_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            company_name: company_name.into(),
            next_due_date,
            vat_number: String::new(),
            license_number: String::new(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            notes: String::new(),
            vat_period: VatPeriod::default(),
            vat_status: VatStatus::default(),
            alerts_enabled: true,
            alert_lead_days: default_lead_days(),
            alert_channel: AlertChannel::default(),
            alert_email: String::new(),
            alert_whatsapp: String::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn with_contact(mut self, person: impl Into<String>) -> Self {
        self.contact_person = person.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_vat_number(mut self, vat_number: impl Into<String>) -> Self {
        self.vat_number = vat_number.into();
        self
    }

    pub fn with_license_number(mut self, license_number: impl Into<String>) -> Self {
        self.license_number = license_number.into();
        self
    }

    pub fn with_period(mut self, period: VatPeriod) -> Self {
        self.vat_period = period;
        self
    }

    pub fn with_lead_days(mut self, days: u32) -> Self {
        self.alert_lead_days = days;
        self
    }

    pub fn with_channel(mut self, channel: AlertChannel) -> Self {
        self.alert_channel = channel;
        self
    }

    pub fn with_alert_email(mut self, address: impl Into<String>) -> Self {
        self.alert_email = address.into();
        self
    }

    pub fn with_alert_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.alert_whatsapp = number.into();
        self
    }
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_lead_days() -> u32 {
    7
}

fn lead_days_compat<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Num(n) if n >= 0 => n as u32,
        Raw::Text(s) => s.trim().parse().unwrap_or_else(|_| default_lead_days()),
        _ => default_lead_days(),
    })
}

/// Parse a due date in the `YYYY-MM-DD` wire format.
pub fn parse_due_date(s: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(s.trim().to_string()))
}
