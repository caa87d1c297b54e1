use tera::{Context, Tera};

use crate::invoice::{InvoiceDocument, InvoiceError};

/// Name under which the invoice template is registered in [`Tera`].
pub const INVOICE_TEMPLATE: &str = "invoice.xml";

/// Render the XML intermediate of an invoice.
pub fn render_xml(tera: &Tera, document: &InvoiceDocument) -> Result<String, InvoiceError> {
    let context = Context::from_serialize(document)?;
    Ok(tera.render(INVOICE_TEMPLATE, &context)?)
}
