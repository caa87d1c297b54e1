use serde::Serialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::canteen::Canteen;
use crate::invoice::{self, InvoiceDocument, InvoiceStore, render_pdf, render_xml};
use crate::repository::{CanteenReader, OrderReader, OrderStatusReader};
use crate::services::orders::load_visible_order;
use crate::services::{ServiceError, ServiceResult};

/// Where the rendered invoice of an order was stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvoiceReceipt {
    pub order_id: i32,
    pub xml_key: String,
    pub pdf_key: String,
    pub pdf_size: usize,
}

/// Render the invoice of a fulfilled order and upload the XML and PDF.
///
/// Running it again overwrites the stored documents.
pub fn export_invoice<R, S>(
    repo: &R,
    store: &S,
    tera: &Tera,
    user: &AuthenticatedEmployee,
    order_id: i32,
) -> ServiceResult<InvoiceReceipt>
where
    R: OrderReader + CanteenReader + OrderStatusReader + ?Sized,
    S: InvoiceStore + ?Sized,
{
    let order = load_visible_order(repo, user, order_id)?;

    let status = repo
        .get_order_status_by_id(order.status_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::Internal(format!("order {} has no status", order.id)))?;

    if !status.is_fulfilled {
        return Err(ServiceError::Precondition(
            "invoices are only issued for fulfilled orders".to_string(),
        ));
    }

    let customer = load_canteen(repo, order.customer_canteen_id)?;
    let executor = load_canteen(repo, order.executor_canteen_id)?;

    let document = InvoiceDocument::from_order(&order, &customer, &executor, &status);

    let xml = render_xml(tera, &document)?;
    let pdf = render_pdf(&document)?;

    let xml_key = invoice::xml_key(order.id);
    let pdf_key = invoice::pdf_key(order.id);

    store.put(&xml_key, xml.as_bytes())?;
    store.put(&pdf_key, &pdf)?;

    log::info!(
        "invoice {} for order {} stored ({} bytes)",
        document.number,
        order.id,
        pdf.len()
    );

    Ok(InvoiceReceipt {
        order_id: order.id,
        xml_key,
        pdf_key,
        pdf_size: pdf.len(),
    })
}

/// Fetch the stored PDF invoice of a visible order.
pub fn fetch_invoice<R, S>(
    repo: &R,
    store: &S,
    user: &AuthenticatedEmployee,
    order_id: i32,
) -> ServiceResult<Vec<u8>>
where
    R: OrderReader + ?Sized,
    S: InvoiceStore + ?Sized,
{
    let order = load_visible_order(repo, user, order_id)?;

    store
        .get(&invoice::pdf_key(order.id))
        .map_err(ServiceError::from)
}

fn load_canteen<R>(repo: &R, canteen_id: i32) -> ServiceResult<Canteen>
where
    R: CanteenReader + ?Sized,
{
    repo.get_canteen_by_id(canteen_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::Internal(format!("canteen {canteen_id} is missing")))
}
