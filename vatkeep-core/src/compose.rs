//! Reminder text composition for the two delivery channels.
//!
//! Output is deterministic for a given (record, today): dates are rendered
//! through a fixed month table instead of the environment locale, and the
//! day count comes from the classifier.

use chrono::{Datelike, NaiveDate};

use crate::classify::classify;
use crate::client::ClientRecord;

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Render a date as `DD Mon YYYY`, e.g. `15 Feb 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTH_ABBREV[date.month0() as usize],
        date.year()
    )
}

/// Subject line for the email channel.
pub fn email_subject(record: &ClientRecord) -> String {
    format!("VAT Return Reminder - {}", record.company_name)
}

/// Formal reminder for the email channel.
pub fn compose_email(record: &ClientRecord, today: NaiveDate) -> String {
    let due = format_date(record.next_due_date);
    let days = classify(record.next_due_date, today).day_count;
    let greeting = if record.contact_person.is_empty() {
        "Valued Client"
    } else {
        record.contact_person.as_str()
    };

    format!(
        "Dear {greeting},\n\n\
         This is a reminder that your VAT return for {company} is due on {due} ({days} days from now).\n\n\
         Please ensure all necessary documentation is prepared and submitted on time to avoid any late filing penalties.\n\n\
         If you have any questions or need assistance with your VAT return, please don't hesitate to contact us.\n\n\
         Best regards,\n\
         Your VAT Management Team",
        company = record.company_name,
    )
}

/// Short informal reminder for the WhatsApp channel.
pub fn compose_chat(record: &ClientRecord, today: NaiveDate) -> String {
    let due = format_date(record.next_due_date);
    let days = classify(record.next_due_date, today).day_count;
    let greeting = if record.contact_person.is_empty() {
        "there"
    } else {
        record.contact_person.as_str()
    };

    format!(
        "\u{1F514} VAT Return Reminder\n\n\
         Hi {greeting}!\n\n\
         Your VAT return for {company} is due on {due} ({days} days).\n\n\
         Please ensure timely submission to avoid penalties.\n\n\
         Need help? Contact us! \u{1F4DE}",
        company = record.company_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_date_is_locale_independent() {
        assert_eq!(format_date(day(2024, 2, 15)), "15 Feb 2024");
        assert_eq!(format_date(day(2025, 12, 1)), "01 Dec 2025");
    }

    #[test]
    fn email_uses_fallback_greeting() {
        let rec = ClientRecord::new("Acme", day(2024, 2, 15));
        let msg = compose_email(&rec, day(2024, 2, 10));

        assert!(msg.starts_with("Dear Valued Client,"));
        assert!(msg.contains("Acme"));
        assert!(msg.contains("15 Feb 2024"));
        assert!(msg.contains("(5 days from now)"));
    }

    #[test]
    fn email_addresses_contact_by_name() {
        let rec = ClientRecord::new("Acme", day(2024, 2, 15)).with_contact("John Smith");
        let msg = compose_email(&rec, day(2024, 2, 10));
        assert!(msg.starts_with("Dear John Smith,"));
    }

    #[test]
    fn chat_keeps_glyphs_and_company() {
        let rec = ClientRecord::new("Acme", day(2024, 2, 15)).with_contact("John");
        let msg = compose_chat(&rec, day(2024, 2, 10));

        assert!(msg.contains('\u{1F514}'));
        assert!(msg.contains('\u{1F4DE}'));
        assert!(msg.contains("Hi John!"));
        assert!(msg.contains("Acme"));
        assert!(msg.contains("(5 days)"));
    }

    #[test]
    fn composition_is_deterministic() {
        let rec = ClientRecord::new("Acme", day(2024, 2, 15)).with_contact("John");
        let today = day(2024, 2, 10);

        assert_eq!(compose_email(&rec, today), compose_email(&rec, today));
        assert_eq!(compose_chat(&rec, today), compose_chat(&rec, today));
    }

    #[test]
    fn subject_names_the_company() {
        let rec = ClientRecord::new("Tech Solutions Ltd", day(2024, 2, 15));
        assert_eq!(
            email_subject(&rec),
            "VAT Return Reminder - Tech Solutions Ltd"
        );
    }
}
