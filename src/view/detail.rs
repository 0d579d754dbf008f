//! Invoice detail view

use super::format::{format_amount, format_date};
use crate::types::Invoice;
use std::fmt::Write as _;

/// Detail screen for one invoice id
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDetail {
    id: String,
    invoice: Option<Invoice>,
}

impl InvoiceDetail {
    /// `invoice` is whatever the list already had loaded for `id`
    pub fn new(id: impl Into<String>, invoice: Option<Invoice>) -> Self {
        Self {
            id: id.into(),
            invoice,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[Back]  Detail");
        out.push('\n');
        let _ = writeln!(out, "Id:        {}", self.id);

        if let Some(invoice) = &self.invoice {
            let _ = writeln!(out, "Recipient: {}", invoice.recipient);
            let _ = writeln!(out, "Date:      {}", format_date(&invoice.date));
            let _ = writeln!(out, "Amount:    {}", format_amount(&invoice.amount));
        }

        out
    }
}
