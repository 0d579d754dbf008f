//! Common types used throughout invoice-pager
//!
//! Domain records received from the invoices API and the small value
//! types passed between the pagination, fetch and view layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Records
// ============================================================================

/// Monetary amount as delivered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code (e.g., "USD", "CLP")
    pub currency: String,
    /// Decimal value in major units
    pub value: f64,
}

impl Amount {
    /// Create a new amount
    pub fn new(currency: impl Into<String>, value: f64) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

/// A single invoice. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub amount: Amount,
    pub date: DateTime<Utc>,
    pub recipient: String,
}

// ============================================================================
// Host Contracts
// ============================================================================

/// Payload of the invoice click contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceClick {
    pub id: String,
}

impl InvoiceClick {
    /// Create a click for the given invoice id
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<&Invoice> for InvoiceClick {
    fn from(invoice: &Invoice) -> Self {
        Self::new(invoice.id.clone())
    }
}

/// Payload of the page change contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoice_deserialize() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "inv_001",
            "amount": {"currency": "USD", "value": 1250.5},
            "date": "2021-03-04T10:15:00Z",
            "recipient": "Acme Corp"
        }))
        .unwrap();

        assert_eq!(invoice.id, "inv_001");
        assert_eq!(invoice.amount, Amount::new("USD", 1250.5));
        assert_eq!(invoice.date.to_rfc3339(), "2021-03-04T10:15:00+00:00");
        assert_eq!(invoice.recipient, "Acme Corp");
    }

    #[test]
    fn test_invoice_click_from_invoice() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "abc",
            "amount": {"currency": "EUR", "value": 1.0},
            "date": "2021-01-01T00:00:00Z",
            "recipient": "Someone"
        }))
        .unwrap();

        assert_eq!(InvoiceClick::from(&invoice), InvoiceClick::new("abc"));
    }
}
