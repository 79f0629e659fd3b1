use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::fs::File;
use std::path::PathBuf;

use vatkeep_core::{
    AlertChannel, BucketFilter, ClientRecord, VatPeriod, VatStatus, classify, format_date,
    is_alert_due, parse_due_date, today_in_tz,
};
use vatkeep_store::{SendStatus, export_csv};

use crate::config::load_config;
use crate::state::{data_path, open_store};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Company name
    #[arg(long)]
    pub company: String,

    /// Next filing due date, YYYY-MM-DD
    #[arg(long)]
    pub due: String,

    #[arg(long)]
    pub vat_number: Option<String>,

    #[arg(long)]
    pub license_number: Option<String>,

    /// Contact person used in reminder greetings
    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Filing period: monthly, quarterly, annually
    #[arg(long)]
    pub period: Option<VatPeriod>,

    /// Days before the due date to start reminding (default from config)
    #[arg(long)]
    pub lead_days: Option<u32>,

    /// Reminder channel: email, whatsapp, both (default from config)
    #[arg(long)]
    pub channel: Option<AlertChannel>,

    #[arg(long)]
    pub alert_email: Option<String>,

    #[arg(long)]
    pub alert_whatsapp: Option<String>,

    /// Disable reminders for this client
    #[arg(long, default_value_t = false)]
    pub no_alerts: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Client id, e.g. client-0001
    pub id: String,

    #[arg(long)]
    pub company: Option<String>,

    /// Next filing due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub vat_number: Option<String>,

    #[arg(long)]
    pub license_number: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub period: Option<VatPeriod>,

    #[arg(long)]
    pub lead_days: Option<u32>,

    #[arg(long)]
    pub channel: Option<AlertChannel>,

    #[arg(long)]
    pub alert_email: Option<String>,

    #[arg(long)]
    pub alert_whatsapp: Option<String>,

    /// Enable or disable reminders: --alerts true|false
    #[arg(long)]
    pub alerts: Option<bool>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// all, urgent, upcoming, or alerts (clients with a reminder due)
    #[arg(long, default_value = "all", value_parser = parse_filter)]
    pub filter: BucketFilter,

    /// Case-insensitive search over company, VAT number, contact, email
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of rows printed
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

fn parse_filter(s: &str) -> Result<BucketFilter, String> {
    match s.trim().to_lowercase().as_str() {
        "all" => Ok(BucketFilter::All),
        "urgent" => Ok(BucketFilter::Urgent),
        "upcoming" => Ok(BucketFilter::Upcoming),
        "alerts" | "alerts-pending" => Ok(BucketFilter::AlertsPending),
        other => Err(format!(
            "unknown filter: {other} (expected all, urgent, upcoming, alerts)"
        )),
    }
}

pub fn add(args: AddArgs) -> Result<()> {
    let cfg = load_config()?;
    let due = parse_due_date(&args.due)?;

    let mut draft = ClientRecord::new(args.company, due);
    draft.vat_number = args.vat_number.unwrap_or_default();
    draft.license_number = args.license_number.unwrap_or_default();
    draft.contact_person = args.contact.unwrap_or_default();
    draft.email = args.email.unwrap_or_default();
    draft.phone = args.phone.unwrap_or_default();
    draft.notes = args.notes.unwrap_or_default();
    draft.vat_period = args.period.unwrap_or_default();
    draft.alert_lead_days = args.lead_days.unwrap_or(cfg.alerts.default_lead_days);
    draft.alert_channel = args.channel.unwrap_or(cfg.alerts.default_channel);
    draft.alert_email = args.alert_email.unwrap_or_default();
    draft.alert_whatsapp = args.alert_whatsapp.unwrap_or_default();
    draft.alerts_enabled = !args.no_alerts;

    let mut store = open_store()?;
    let record = store.add(draft, Utc::now())?;

    println!(
        "Added {} ({}) due {}",
        record.company_name,
        record.id,
        format_date(record.next_due_date)
    );
    Ok(())
}

pub fn edit(args: EditArgs) -> Result<()> {
    let due = match &args.due {
        Some(raw) => Some(parse_due_date(raw)?),
        None => None,
    };

    let patch = vatkeep_store::ClientUpdate {
        company_name: args.company,
        next_due_date: due,
        vat_number: args.vat_number,
        license_number: args.license_number,
        contact_person: args.contact,
        email: args.email,
        phone: args.phone,
        notes: args.notes,
        vat_period: args.period,
        vat_status: None,
        alerts_enabled: args.alerts,
        alert_lead_days: args.lead_days,
        alert_channel: args.channel,
        alert_email: args.alert_email,
        alert_whatsapp: args.alert_whatsapp,
    };

    let mut store = open_store()?;
    let record = store.update(&args.id, patch)?;
    println!(
        "Updated {} ({}) due {}",
        record.company_name,
        record.id,
        format_date(record.next_due_date)
    );
    Ok(())
}

pub fn remove(id: &str) -> Result<()> {
    let mut store = open_store()?;
    store.remove(id)?;
    println!("Removed {id} and its alert history");
    Ok(())
}

pub fn mark(id: &str, status: VatStatus) -> Result<()> {
    let mut store = open_store()?;
    let record = store.update(
        id,
        vatkeep_store::ClientUpdate {
            vat_status: Some(status),
            ..Default::default()
        },
    )?;
    println!("{} is now {}", record.company_name, record.vat_status.label());
    Ok(())
}

pub fn list(args: ListArgs) -> Result<()> {
    let cfg = load_config()?;
    let now_utc = Utc::now();
    let today = today_in_tz(&cfg.timezone, now_utc)?;
    let store = open_store()?;

    let rows = store.filtered(args.filter, args.search.as_deref(), today);
    if rows.is_empty() {
        println!("No clients match.");
        return Ok(());
    }

    for (i, client) in rows.iter().take(args.limit).enumerate() {
        let cls = classify(client.next_due_date, today);
        let phrase = match cls.bucket {
            vatkeep_core::Bucket::Overdue => format!("{} days overdue", cls.day_count),
            _ => format!("in {} days", cls.day_count),
        };

        let mut markers = Vec::new();
        if is_alert_due(client, today) {
            markers.push("alert due".to_string());
        }
        let sent = store.send_status(&client.id, now_utc, cfg.alerts.recent_window_days);
        if sent != SendStatus::Pending {
            markers.push(sent.label().to_string());
        }
        let markers = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(", "))
        };

        println!(
            "{}. {} {} | {} | due {} ({}) | {}{}",
            i + 1,
            client.id,
            client.company_name,
            cls.bucket.label(),
            format_date(client.next_due_date),
            phrase,
            client.vat_status.label(),
            markers
        );
    }

    if rows.len() > args.limit {
        println!("... and {} more (raise --limit)", rows.len() - args.limit);
    }
    Ok(())
}

pub fn stats() -> Result<()> {
    let cfg = load_config()?;
    let today = today_in_tz(&cfg.timezone, Utc::now())?;
    let store = open_store()?;
    let stats = store.stats(today);

    println!("Clients: {}", stats.total);
    println!("- overdue: {}", stats.overdue);
    println!("- urgent (within 7 days): {}", stats.urgent);
    println!("- upcoming (within 30 days): {}", stats.upcoming);
    println!("- reminders pending: {}", stats.pending_alerts);
    Ok(())
}

pub fn export(out: PathBuf) -> Result<()> {
    let store = open_store()?;
    let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
    export_csv(store.clients(), file)?;
    println!("Wrote {} clients to {}", store.clients().len(), out.display());
    Ok(())
}

pub fn seed() -> Result<()> {
    let cfg = load_config()?;
    let now_utc = Utc::now();
    let today = today_in_tz(&cfg.timezone, now_utc)?;
    let mut store = open_store()?;

    let count = store.seed_demo(today, now_utc)?;
    println!("Seeded {} demo clients into {}", count, data_path()?.display());
    Ok(())
}
