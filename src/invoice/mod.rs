//! Invoice pipeline: order snapshot, XML intermediate, PDF rendering and storage.

use thiserror::Error;

pub mod document;
pub mod pdf;
pub mod retry;
pub mod store;
pub mod xml;

pub use document::{InvoiceDocument, InvoiceLine};
pub use pdf::render_pdf;
pub use store::{HttpInvoiceStore, InvoiceStore, LocalInvoiceStore};
pub use xml::{INVOICE_TEMPLATE, render_xml};

/// Errors raised while rendering or storing invoices.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage request failed: {0}")]
    Http(String),
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("object `{0}` not found")]
    NotFound(String),
}

/// Storage key of the XML intermediate of an order's invoice.
pub fn xml_key(order_id: i32) -> String {
    format!("invoices/{order_id}.xml")
}

/// Storage key of the rendered PDF of an order's invoice.
pub fn pdf_key(order_id: i32) -> String {
    format!("invoices/{order_id}.pdf")
}
