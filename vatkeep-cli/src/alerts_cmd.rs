use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Subcommand;

use vatkeep_core::{
    ClientRecord, classify, compose_chat, compose_email, email_subject, format_date, is_alert_due,
    today_in_tz,
};
use vatkeep_store::SendChannel;

use crate::config::load_config;
use crate::state::open_store;

#[derive(Subcommand, Debug)]
pub enum AlertsCommand {
    /// List clients whose reminder window is open right now
    Pending,

    /// Print the composed email and WhatsApp messages for a client
    Preview {
        /// Client id, e.g. client-0001
        id: String,
    },

    /// Compose a reminder, open it in the OS mail/chat handler, and record the send
    Send {
        /// Client id, e.g. client-0001
        id: String,

        /// email or whatsapp
        #[arg(long, value_parser = parse_channel)]
        channel: SendChannel,

        /// Print the handoff link without opening it or recording a send
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// List recorded sends for a client
    History {
        /// Client id, e.g. client-0001
        id: String,
    },

    /// Show whether a client was reminded within the recency window
    Status {
        /// Client id, e.g. client-0001
        id: String,
    },
}

fn parse_channel(s: &str) -> Result<SendChannel, String> {
    match s.trim().to_lowercase().as_str() {
        "email" => Ok(SendChannel::Email),
        "whatsapp" => Ok(SendChannel::Whatsapp),
        other => Err(format!("unknown channel: {other} (expected email or whatsapp)")),
    }
}

pub fn run(cmd: AlertsCommand) -> Result<()> {
    match cmd {
        AlertsCommand::Pending => pending(),
        AlertsCommand::Preview { id } => preview(&id),
        AlertsCommand::Send { id, channel, dry_run } => send(&id, channel, dry_run),
        AlertsCommand::History { id } => history(&id),
        AlertsCommand::Status { id } => status(&id),
    }
}

fn pending() -> Result<()> {
    let cfg = load_config()?;
    let today = today_in_tz(&cfg.timezone, Utc::now())?;
    let store = open_store()?;

    let due: Vec<&ClientRecord> = store
        .clients()
        .iter()
        .filter(|c| is_alert_due(c, today))
        .collect();

    if due.is_empty() {
        println!("No reminders due.");
        return Ok(());
    }

    for (i, client) in due.iter().enumerate() {
        let days = classify(client.next_due_date, today).day_count;
        println!(
            "{}. {} {} | due {} (in {} days, lead {}) | channel {}",
            i + 1,
            client.id,
            client.company_name,
            format_date(client.next_due_date),
            days,
            client.alert_lead_days,
            client.alert_channel.label()
        );
    }
    Ok(())
}

fn preview(id: &str) -> Result<()> {
    let cfg = load_config()?;
    let today = today_in_tz(&cfg.timezone, Utc::now())?;
    let store = open_store()?;
    let client = store
        .get(id)
        .with_context(|| format!("no client with id {id}"))?;

    println!("# Email — subject: {}\n", email_subject(client));
    println!("{}\n", compose_email(client, today));
    println!("# WhatsApp\n");
    println!("{}", compose_chat(client, today));
    Ok(())
}

fn send(id: &str, channel: SendChannel, dry_run: bool) -> Result<()> {
    let cfg = load_config()?;
    let now_utc = Utc::now();
    let today = today_in_tz(&cfg.timezone, now_utc)?;

    let mut store = open_store()?;
    let client = store
        .get(id)
        .with_context(|| format!("no client with id {id}"))?
        .clone();

    let link = match channel {
        SendChannel::Email => {
            if client.alert_email.trim().is_empty() {
                bail!("No email address configured for this client");
            }
            mailto_link(
                client.alert_email.trim(),
                &email_subject(&client),
                &compose_email(&client, today),
            )
        }
        SendChannel::Whatsapp => {
            let digits = digits_only(&client.alert_whatsapp);
            if digits.is_empty() {
                bail!("No WhatsApp number configured for this client");
            }
            whatsapp_link(&digits, &compose_chat(&client, today))
        }
    };

    if dry_run {
        println!("[DRY RUN] would open: {link}");
        return Ok(());
    }

    open_link(&link)?;
    store.record_send(&client.id, channel, now_utc)?;
    println!(
        "Opened {} handoff for {} and recorded the send",
        channel.label(),
        client.company_name
    );
    Ok(())
}

fn history(id: &str) -> Result<()> {
    let store = open_store()?;
    if store.get(id).is_none() {
        bail!("no client with id {id}");
    }

    let sends = store.history(id);
    if sends.is_empty() {
        println!("No sends recorded for {id}.");
        return Ok(());
    }

    for (i, send) in sends.iter().enumerate() {
        println!("{}. {} at {}", i + 1, send.channel.label(), send.sent_at.to_rfc3339());
    }
    Ok(())
}

fn status(id: &str) -> Result<()> {
    let cfg = load_config()?;
    let store = open_store()?;
    if store.get(id).is_none() {
        bail!("no client with id {id}");
    }

    let status = store.send_status(id, Utc::now(), cfg.alerts.recent_window_days);
    println!("{id}: {}", status.label());
    Ok(())
}

fn mailto_link(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{to}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

fn whatsapp_link(digits: &str, text: &str) -> String {
    format!("https://wa.me/{digits}?text={}", urlencoding::encode(text))
}

fn digits_only(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Hand a link to the OS URL handler (mail client or browser).
fn open_link(link: &str) -> Result<()> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else {
        &["xdg-open", "open"]
    };

    let opener = candidates
        .iter()
        .find_map(|bin| which::which(bin).ok())
        .context("no URL opener found (install xdg-open, or use --dry-run)")?;

    let status = std::process::Command::new(opener)
        .arg(link)
        .status()
        .context("running URL opener")?;

    if !status.success() {
        bail!("URL opener failed with status: {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_link_encodes_subject_and_body() {
        let link = mailto_link("john@acme.example", "VAT Return Reminder - Acme", "Dear John,\nhello");
        assert!(link.starts_with("mailto:john@acme.example?subject="));
        assert!(link.contains("VAT%20Return%20Reminder%20-%20Acme"));
        assert!(link.contains("Dear%20John%2C%0Ahello"));
    }

    #[test]
    fn whatsapp_number_is_stripped_to_digits() {
        assert_eq!(digits_only("+44 20 1234 5678"), "442012345678");
        assert_eq!(digits_only("n/a"), "");
    }

    #[test]
    fn whatsapp_link_shape() {
        let link = whatsapp_link("442012345678", "hi there");
        assert_eq!(link, "https://wa.me/442012345678?text=hi%20there");
    }
}
