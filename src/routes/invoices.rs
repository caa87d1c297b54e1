use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use tera::Tera;

use crate::domain::auth::AuthenticatedEmployee;
use crate::invoice::InvoiceStore;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::invoices::{export_invoice, fetch_invoice};

/// Invoice storage shared by all workers.
pub type SharedInvoiceStore = dyn InvoiceStore + Send + Sync;

// Storage requests block, so they run on the blocking thread pool.

#[post("/orders/{order_id}/invoice")]
pub async fn generate_invoice(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    store: web::Data<SharedInvoiceStore>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = path.into_inner();

    let result = web::block(move || {
        export_invoice(
            repo.get_ref(),
            store.get_ref(),
            tera.get_ref(),
            &user,
            order_id,
        )
    })
    .await
    .unwrap_or_else(|err| Err(ServiceError::Internal(err.to_string())));

    match result {
        Ok(receipt) => HttpResponse::Created().json(receipt),
        Err(err) => error_response(err, &format!("export invoice of order {order_id}")),
    }
}

#[get("/orders/{order_id}/invoice")]
pub async fn download_invoice(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    store: web::Data<SharedInvoiceStore>,
) -> impl Responder {
    let order_id = path.into_inner();

    let result = web::block(move || fetch_invoice(repo.get_ref(), store.get_ref(), &user, order_id))
        .await
        .unwrap_or_else(|err| Err(ServiceError::Internal(err.to_string())));

    match result {
        Ok(pdf) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(format!(
                    "invoice-{order_id}.pdf"
                ))],
            })
            .body(pdf),
        Err(err) => error_response(err, &format!("download invoice of order {order_id}")),
    }
}
