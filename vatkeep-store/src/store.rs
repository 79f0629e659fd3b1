//! The client store: record list + alert history behind an injected backend.
//!
//! Every mutation persists the whole blob, mirroring how small the data set
//! is (tens of clients, not thousands). The engine crate never sees this
//! type; it only receives record snapshots and calendar dates.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use vatkeep_core::{
    AlertChannel, BucketFilter, ClientRecord, VatPeriod, VatStatus, classify, is_alert_due,
};

use crate::backend::StorageBackend;
use crate::history::{AlertSend, SendChannel, SendStatus, send_status};

/// The persisted blob: everything vatkeep knows, in one versioned document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    pub version: u32,
    pub next_client_number: u32,
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub alert_history: HashMap<String, Vec<AlertSend>>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            next_client_number: 1,
            clients: Vec::new(),
            alert_history: HashMap::new(),
        }
    }
}

/// Field-wise patch for [`ClientStore::update`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub company_name: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub vat_number: Option<String>,
    pub license_number: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub vat_period: Option<VatPeriod>,
    pub vat_status: Option<VatStatus>,
    pub alerts_enabled: Option<bool>,
    pub alert_lead_days: Option<u32>,
    pub alert_channel: Option<AlertChannel>,
    pub alert_email: Option<String>,
    pub alert_whatsapp: Option<String>,
}

/// Dashboard counters, derived through the classifier so they can never
/// disagree with the list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub overdue: usize,
    pub urgent: usize,
    pub upcoming: usize,
    pub pending_alerts: usize,
}

pub struct ClientStore {
    data: StoreData,
    backend: Box<dyn StorageBackend>,
}

impl ClientStore {
    /// Load existing data through the backend, or start empty.
    pub fn open(backend: Box<dyn StorageBackend>) -> Result<Self> {
        let data = backend.load()?.unwrap_or_default();
        Ok(Self { data, backend })
    }

    /// Add a draft record: assigns the next `client-NNNN` id, stamps
    /// `created_at`, persists, and returns the stored record.
    pub fn add(&mut self, draft: ClientRecord, now_utc: DateTime<Utc>) -> Result<ClientRecord> {
        if draft.company_name.trim().is_empty() {
            bail!("company name must not be empty");
        }

        let mut record = draft;
        record.id = format!("client-{:04}", self.data.next_client_number);
        self.data.next_client_number += 1;
        record.created_at = now_utc;

        self.data.clients.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Patch an existing record. Identity and creation time are immutable.
    pub fn update(&mut self, id: &str, patch: ClientUpdate) -> Result<ClientRecord> {
        let Some(record) = self.data.clients.iter_mut().find(|c| c.id == id) else {
            bail!("no client with id {id}");
        };

        if let Some(name) = patch.company_name {
            if name.trim().is_empty() {
                bail!("company name must not be empty");
            }
            record.company_name = name;
        }
        if let Some(v) = patch.next_due_date {
            record.next_due_date = v;
        }
        if let Some(v) = patch.vat_number {
            record.vat_number = v;
        }
        if let Some(v) = patch.license_number {
            record.license_number = v;
        }
        if let Some(v) = patch.contact_person {
            record.contact_person = v;
        }
        if let Some(v) = patch.email {
            record.email = v;
        }
        if let Some(v) = patch.phone {
            record.phone = v;
        }
        if let Some(v) = patch.notes {
            record.notes = v;
        }
        if let Some(v) = patch.vat_period {
            record.vat_period = v;
        }
        if let Some(v) = patch.vat_status {
            record.vat_status = v;
        }
        if let Some(v) = patch.alerts_enabled {
            record.alerts_enabled = v;
        }
        if let Some(v) = patch.alert_lead_days {
            record.alert_lead_days = v;
        }
        if let Some(v) = patch.alert_channel {
            record.alert_channel = v;
        }
        if let Some(v) = patch.alert_email {
            record.alert_email = v;
        }
        if let Some(v) = patch.alert_whatsapp {
            record.alert_whatsapp = v;
        }

        let updated = record.clone();
        self.persist()?;
        Ok(updated)
    }

    /// Remove a record and its alert history.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.data.clients.len();
        self.data.clients.retain(|c| c.id != id);
        if self.data.clients.len() == before {
            bail!("no client with id {id}");
        }
        self.data.alert_history.remove(id);
        self.persist()
    }

    pub fn get(&self, id: &str) -> Option<&ClientRecord> {
        self.data.clients.iter().find(|c| c.id == id)
    }

    pub fn clients(&self) -> &[ClientRecord] {
        &self.data.clients
    }

    /// Case-insensitive substring search over company name, VAT number,
    /// contact person, and email.
    pub fn search(&self, term: &str) -> Vec<&ClientRecord> {
        let term = term.to_lowercase();
        self.data
            .clients
            .iter()
            .filter(|c| matches_search(c, &term))
            .collect()
    }

    /// Search + bucket filter, preserving stored order.
    pub fn filtered(
        &self,
        filter: BucketFilter,
        search_term: Option<&str>,
        today: NaiveDate,
    ) -> Vec<&ClientRecord> {
        let term = search_term.map(str::to_lowercase);
        self.data
            .clients
            .iter()
            .filter(|c| term.as_deref().is_none_or(|t| matches_search(c, t)))
            .filter(|c| filter.matches(c, today))
            .collect()
    }

    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        let mut stats = DashboardStats {
            total: self.data.clients.len(),
            overdue: 0,
            urgent: 0,
            upcoming: 0,
            pending_alerts: 0,
        };

        for client in &self.data.clients {
            match classify(client.next_due_date, today).bucket {
                vatkeep_core::Bucket::Overdue => stats.overdue += 1,
                vatkeep_core::Bucket::Urgent => stats.urgent += 1,
                vatkeep_core::Bucket::Upcoming => stats.upcoming += 1,
                vatkeep_core::Bucket::Normal => {}
            }
            if is_alert_due(client, today) {
                stats.pending_alerts += 1;
            }
        }

        stats
    }

    /// Append a send record for a client and persist.
    pub fn record_send(
        &mut self,
        id: &str,
        channel: SendChannel,
        now_utc: DateTime<Utc>,
    ) -> Result<()> {
        if self.get(id).is_none() {
            bail!("no client with id {id}");
        }
        self.data
            .alert_history
            .entry(id.to_string())
            .or_default()
            .push(AlertSend {
                channel,
                sent_at: now_utc,
            });
        self.persist()
    }

    pub fn send_status(&self, id: &str, now_utc: DateTime<Utc>, window_days: i64) -> SendStatus {
        send_status(self.history(id), now_utc, window_days)
    }

    pub fn history(&self, id: &str) -> &[AlertSend] {
        self.data
            .alert_history
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Populate sample clients when the store is empty. Due dates are placed
    /// relative to `today` so each urgency bucket has a representative.
    pub fn seed_demo(&mut self, today: NaiveDate, now_utc: DateTime<Utc>) -> Result<usize> {
        if !self.data.clients.is_empty() {
            bail!("store already has clients; refusing to seed demo data");
        }

        let mut tech = ClientRecord::new("Tech Solutions Ltd", today + Duration::days(5))
            .with_vat_number("GB123456789")
            .with_license_number("LIC123456")
            .with_contact("John Smith")
            .with_email("john@techsolutions.com")
            .with_phone("+44 20 1234 5678")
            .with_period(VatPeriod::Quarterly)
            .with_alert_email("john@techsolutions.com")
            .with_alert_whatsapp("+44 20 1234 5678");
        tech.notes = "Software development company".to_string();

        let mut green = ClientRecord::new("Green Energy Co", today + Duration::days(20))
            .with_vat_number("GB987654321")
            .with_license_number("LIC789012")
            .with_contact("Sarah Johnson")
            .with_email("sarah@greenenergy.co.uk")
            .with_phone("+44 20 9876 5432")
            .with_period(VatPeriod::Monthly)
            .with_lead_days(14)
            .with_channel(AlertChannel::Email)
            .with_alert_email("sarah@greenenergy.co.uk");
        green.vat_status = VatStatus::Submitted;
        green.notes = "Renewable energy provider".to_string();

        let mut global = ClientRecord::new("Global Trading Ltd", today + Duration::days(45))
            .with_vat_number("GB555666777")
            .with_license_number("LIC112233")
            .with_contact("Michael Brown")
            .with_email("michael@globaltrading.com")
            .with_phone("+44 20 5555 6666")
            .with_period(VatPeriod::Quarterly)
            .with_lead_days(21)
            .with_channel(AlertChannel::Whatsapp)
            .with_alert_whatsapp("+44 20 5555 6666");
        global.vat_status = VatStatus::Paid;
        global.notes = "Import/export business".to_string();

        let samples = [tech, green, global];
        let count = samples.len();
        for sample in samples {
            self.add(sample, now_utc)?;
        }
        Ok(count)
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.data)
    }
}

fn matches_search(client: &ClientRecord, lower_term: &str) -> bool {
    client.company_name.to_lowercase().contains(lower_term)
        || client.vat_number.to_lowercase().contains(lower_term)
        || client.contact_person.to_lowercase().contains(lower_term)
        || client.email.to_lowercase().contains(lower_term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap()
    }

    fn empty_store() -> ClientStore {
        ClientStore::open(Box::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut store = empty_store();
        let a = store
            .add(ClientRecord::new("Acme", day(2024, 3, 1)), now())
            .unwrap();
        let b = store
            .add(ClientRecord::new("Beta", day(2024, 3, 2)), now())
            .unwrap();

        assert_eq!(a.id, "client-0001");
        assert_eq!(b.id, "client-0002");
        assert_eq!(a.created_at, now());
    }

    #[test]
    fn add_rejects_blank_company() {
        let mut store = empty_store();
        let err = store
            .add(ClientRecord::new("   ", day(2024, 3, 1)), now())
            .unwrap_err();
        assert!(err.to_string().contains("company name"));
    }

    #[test]
    fn update_patches_fields_and_keeps_identity() {
        let mut store = empty_store();
        let rec = store
            .add(ClientRecord::new("Acme", day(2024, 3, 1)), now())
            .unwrap();

        let updated = store
            .update(
                &rec.id,
                ClientUpdate {
                    contact_person: Some("Jane Doe".to_string()),
                    vat_status: Some(VatStatus::Submitted),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, rec.id);
        assert_eq!(updated.created_at, rec.created_at);
        assert_eq!(updated.contact_person, "Jane Doe");
        assert_eq!(updated.vat_status, VatStatus::Submitted);
        assert_eq!(updated.company_name, "Acme");
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut store = empty_store();
        assert!(store.update("client-9999", ClientUpdate::default()).is_err());
    }

    #[test]
    fn remove_drops_record_and_history() {
        let mut store = empty_store();
        let rec = store
            .add(ClientRecord::new("Acme", day(2024, 3, 1)), now())
            .unwrap();
        store
            .record_send(&rec.id, SendChannel::Email, now())
            .unwrap();

        store.remove(&rec.id).unwrap();
        assert!(store.get(&rec.id).is_none());
        assert!(store.history(&rec.id).is_empty());
    }

    #[test]
    fn search_matches_any_field_case_insensitive() {
        let mut store = empty_store();
        store
            .add(
                ClientRecord::new("Acme", day(2024, 3, 1))
                    .with_vat_number("GB123")
                    .with_contact("John Smith")
                    .with_email("john@acme.example"),
                now(),
            )
            .unwrap();
        store
            .add(ClientRecord::new("Beta", day(2024, 3, 2)), now())
            .unwrap();

        assert_eq!(store.search("ACME").len(), 1);
        assert_eq!(store.search("gb123").len(), 1);
        assert_eq!(store.search("smith").len(), 1);
        assert_eq!(store.search("@acme").len(), 1);
        assert_eq!(store.search("zzz").len(), 0);
    }

    #[test]
    fn stats_count_through_classifier() {
        let today = day(2024, 2, 10);
        let mut store = empty_store();
        store
            .add(ClientRecord::new("Late", today - Duration::days(2)), now())
            .unwrap();
        store
            .add(ClientRecord::new("Soon", today + Duration::days(3)), now())
            .unwrap();
        store
            .add(ClientRecord::new("Month", today + Duration::days(20)), now())
            .unwrap();
        store
            .add(ClientRecord::new("Later", today + Duration::days(60)), now())
            .unwrap();

        let stats = store.stats(today);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.upcoming, 1);
        // "Soon" is inside its 7-day lead window; the others are not alertable.
        assert_eq!(stats.pending_alerts, 1);
    }

    #[test]
    fn seed_demo_only_on_empty_store() {
        let today = day(2024, 2, 10);
        let mut store = empty_store();
        assert_eq!(store.seed_demo(today, now()).unwrap(), 3);
        assert!(store.seed_demo(today, now()).is_err());

        let stats = store.stats(today);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.upcoming, 1);
    }
}
