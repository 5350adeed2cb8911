//! Invoice number formatting.
//!
//! Numbers follow `{prefix}-{YYYYMM}-{sequence}`. The sequence is issued by
//! the store per organization; formatting alone never allocates one.

use chrono::{Datelike, NaiveDate};

/// Formats an invoice number from a prefix, the billing period's first day,
/// and an organization-scoped sequence number.
#[must_use]
pub fn format_invoice_number(prefix: &str, period_start: NaiveDate, sequence: u64) -> String {
    format!(
        "{prefix}-{:04}{:02}-{sequence:06}",
        period_start.year(),
        period_start.month()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format() {
        assert_eq!(
            format_invoice_number("INV", date(2026, 6, 1), 42),
            "INV-202606-000042"
        );
    }

    #[test]
    fn test_custom_prefix_and_large_sequence() {
        assert_eq!(
            format_invoice_number("ACME", date(2026, 12, 15), 1_234_567),
            "ACME-202612-1234567"
        );
    }
}
