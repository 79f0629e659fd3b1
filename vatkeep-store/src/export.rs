//! CSV export of the client list.

use anyhow::Result;
use std::io::Write;

use vatkeep_core::{ClientRecord, format_date};

const HEADER: [&str; 7] = [
    "Company Name",
    "VAT Number",
    "License Number",
    "Contact Person",
    "Next Due Date",
    "VAT Status",
    "VAT Period",
];

pub fn export_csv<W: Write>(clients: &[ClientRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for client in clients {
        let due = format_date(client.next_due_date);
        writer.write_record([
            client.company_name.as_str(),
            client.vat_number.as_str(),
            client.license_number.as_str(),
            client.contact_person.as_str(),
            due.as_str(),
            client.vat_status.label(),
            client.vat_period.label(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vatkeep_core::VatStatus;

    #[test]
    fn header_plus_one_row_per_client() {
        let due = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let mut rec = ClientRecord::new("Acme", due)
            .with_vat_number("GB123456789")
            .with_contact("John Smith");
        rec.vat_status = VatStatus::Submitted;

        let mut buf = Vec::new();
        export_csv(&[rec], &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Company Name,VAT Number"));
        assert!(lines[1].contains("Acme"));
        assert!(lines[1].contains("15 Feb 2024"));
        assert!(lines[1].contains("submitted"));
        assert!(lines[1].contains("quarterly"));
    }

    #[test]
    fn empty_list_is_header_only() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
