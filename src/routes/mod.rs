use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::repository::{DieselRepository, EmployeeReader};
use crate::services::ServiceError;

pub mod auth;
pub mod canteens;
pub mod employees;
pub mod invoices;
pub mod order_statuses;
pub mod orders;
pub mod products;

/// Register every handler of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::change_password)
        .service(employees::show_employees)
        .service(employees::add_employee)
        .service(employees::show_employee)
        .service(employees::edit_employee)
        .service(employees::reset_password)
        .service(employees::delete_employee)
        .service(canteens::show_canteens)
        .service(canteens::add_canteen)
        .service(canteens::show_canteen)
        .service(canteens::edit_canteen)
        .service(canteens::delete_canteen)
        .service(products::show_products)
        .service(products::add_product)
        .service(products::upload_products)
        .service(products::show_product)
        .service(products::edit_product)
        .service(products::delete_product)
        .service(order_statuses::show_order_statuses)
        .service(order_statuses::add_order_status)
        .service(order_statuses::edit_order_status)
        .service(order_statuses::delete_order_status)
        .service(orders::show_orders)
        .service(orders::add_order)
        .service(orders::show_order)
        .service(orders::delete_order)
        .service(orders::edit_order_items)
        .service(orders::decide_item)
        .service(orders::change_status)
        .service(orders::show_history)
        .service(invoices::generate_invoice)
        .service(invoices::download_invoice);
}

impl FromRequest for AuthenticatedEmployee {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(employee_from_identity(req))
    }
}

fn employee_from_identity(req: &HttpRequest) -> Result<AuthenticatedEmployee, actix_web::Error> {
    let claims = req
        .get_identity()
        .ok()
        .and_then(|identity| identity.id().ok())
        .ok_or_else(|| unauthorized("login required"))?;

    let session: AuthenticatedEmployee = serde_json::from_str(&claims).map_err(|err| {
        log::warn!("Discarding unreadable session identity: {err}");
        unauthorized("session is invalid, log in again")
    })?;

    // Role and canteen come from the current record, not from the cookie.
    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| internal("repository is not configured"))?;

    match repo.get_employee_by_id(session.id) {
        Ok(Some(employee)) => Ok(AuthenticatedEmployee::from(&employee)),
        Ok(None) => {
            log::warn!("Session refers to removed employee {}", session.id);
            Err(unauthorized("account no longer exists, log in again"))
        }
        Err(err) => {
            log::error!("Failed to load employee {}: {err}", session.id);
            Err(internal("failed to load the session"))
        }
    }
}

fn internal(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::InternalServerError().json(json!({ "error": "internal error" })),
    )
    .into()
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({ "error": message })),
    )
    .into()
}

/// Translate a service failure into a JSON error response.
pub(crate) fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Forbidden().json(json!({ "error": "insufficient permissions" }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Conflict => HttpResponse::Conflict()
            .json(json!({ "error": "conflicts with existing data" })),
        ServiceError::Form(message) => {
            HttpResponse::UnprocessableEntity().json(json!({ "error": message }))
        }
        ServiceError::Precondition(message) => {
            HttpResponse::Conflict().json(json!({ "error": message }))
        }
        ServiceError::Internal(message) => {
            log::error!("Failed to {action}: {message}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}
