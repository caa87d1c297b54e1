use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::canteen::Canteen;
use crate::domain::order::{ItemDecision, Order};
use crate::domain::order_status::OrderStatus;

/// One accepted line as printed on the invoice.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvoiceLine {
    /// 1-based position on the invoice.
    pub position: usize,
    pub name: String,
    pub unit: String,
    pub quantity: i32,
    pub price_cents: i64,
    pub total_cents: i64,
    pub price: String,
    pub total: String,
}

/// Everything needed to render an invoice, detached from the database.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub number: String,
    pub order_id: i32,
    pub issued_at: NaiveDateTime,
    pub status: String,
    pub customer: String,
    pub executor: String,
    pub lines: Vec<InvoiceLine>,
    pub total_cents: i64,
    pub total: String,
}

impl InvoiceDocument {
    /// Build the invoice of `order`. Only accepted items are billed.
    pub fn from_order(
        order: &Order,
        customer: &Canteen,
        executor: &Canteen,
        status: &OrderStatus,
    ) -> Self {
        let lines: Vec<InvoiceLine> = order
            .items
            .iter()
            .filter(|item| item.decision == ItemDecision::Accepted)
            .enumerate()
            .map(|(index, item)| {
                let total_cents = item.line_total_cents();
                InvoiceLine {
                    position: index + 1,
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    quantity: item.quantity,
                    price_cents: item.price_cents,
                    total_cents,
                    price: format_cents(item.price_cents),
                    total: format_cents(total_cents),
                }
            })
            .collect();

        let total_cents = lines
            .iter()
            .map(|line| line.total_cents)
            .fold(0, i64::saturating_add);

        Self {
            number: format!("INV-{:06}", order.id),
            order_id: order.id,
            issued_at: order.updated_at,
            status: status.name.clone(),
            customer: customer.address.clone(),
            executor: executor.address.clone(),
            lines,
            total_cents,
            total: format_cents(total_cents),
        }
    }
}

/// Render an amount in the smallest currency unit as `units.cents`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
