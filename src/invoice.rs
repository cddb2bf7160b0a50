//! Invoice / quotation builder.
//!
//! An [`Invoice`] is an append-only ledger of line items with a running
//! total. Items are validated before anything changes: a rejected item leaves
//! the ledger, the total and the caller's draft exactly as they were.
//!
//! The [`ItemDraft`] models the three input fields as raw text. Submitting a
//! draft parses it leniently (like a form), adds the item, and clears the
//! draft only on success.

use crate::parse;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown when an item is rejected.
pub const INVALID_ITEM_MESSAGE: &str = "Please enter valid Item Name, Quantity, and Price.";

/// Header text when no client name has been entered.
pub const DEFAULT_CLIENT: &str = "Client Name";

/// `dd/mm/yyyy`.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvoiceError {
    #[error("{}", INVALID_ITEM_MESSAGE)]
    InvalidItem,
}

/// One billed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// The ledger plus its header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    client: String,
    date: NaiveDate,
    items: Vec<LineItem>,
    total: f64,
}

impl Invoice {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            client: String::new(),
            date,
            items: Vec::new(),
            total: 0.0,
        }
    }

    /// Invoice dated today in local time.
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn set_client(&mut self, client: &str) {
        self.client = client.to_string();
    }

    /// Client name for the header, or [`DEFAULT_CLIENT`] when empty.
    pub fn client_display(&self) -> &str {
        if self.client.is_empty() {
            DEFAULT_CLIENT
        } else {
            &self.client
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Running sum of all line totals.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Append a line item.
    ///
    /// Rejects an empty description or a non-positive quantity or price
    /// without changing anything.
    pub fn add_item(
        &mut self,
        description: &str,
        quantity: f64,
        unit_price: f64,
    ) -> Result<&LineItem, InvoiceError> {
        let valid = !description.is_empty()
            && quantity.is_finite()
            && quantity > 0.0
            && unit_price.is_finite()
            && unit_price > 0.0;
        if !valid {
            warn!(
                description,
                quantity, unit_price, "invoice: rejected line item"
            );
            return Err(InvoiceError::InvalidItem);
        }

        let item = LineItem {
            description: description.to_string(),
            quantity,
            unit_price,
        };
        self.total += item.total();
        debug!(
            description,
            line_total = item.total(),
            running_total = self.total,
            "invoice: added line item"
        );
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }
}

/// The item input fields as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub description: String,
    pub quantity: String,
    pub price: String,
}

impl ItemDraft {
    pub fn new(description: &str, quantity: &str, price: &str) -> Self {
        Self {
            description: description.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }

    /// Parse `description,quantity,price`. The description may itself
    /// contain commas; the last two fields are split off from the right.
    pub fn from_spec(spec: &str) -> Self {
        let mut parts = spec.rsplitn(3, ',');
        let price = parts.next().unwrap_or_default();
        let quantity = parts.next().unwrap_or_default();
        let description = parts.next().unwrap_or_default();
        Self::new(description.trim(), quantity.trim(), price.trim())
    }

    /// Add this draft to `invoice`; clears the fields only if it was accepted.
    ///
    /// Non-numeric quantity or price counts as 0 and is therefore rejected.
    pub fn submit(&mut self, invoice: &mut Invoice) -> Result<(), InvoiceError> {
        let quantity = parse::leading_float(&self.quantity).unwrap_or(0.0);
        let price = parse::leading_float(&self.price).unwrap_or(0.0);
        invoice.add_item(&self.description, quantity, price)?;
        *self = ItemDraft::default();
        Ok(())
    }
}

/// Format an amount with two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Format a quantity in shortest form: `2`, `1.5`.
pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity}")
}

/// Amount with currency symbol: `₹170.00`.
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{currency}{}", format_amount(amount))
}

/// Format `date` with a strftime pattern, `None` if the pattern is unusable.
pub fn try_format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

/// Format `date`, falling back to [`DEFAULT_DATE_FORMAT`] for a bad pattern.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    try_format_date(date, format)
        .or_else(|| try_format_date(date, DEFAULT_DATE_FORMAT))
        .unwrap_or_default()
}
