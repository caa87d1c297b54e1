use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::order_statuses::{AddOrderStatusForm, EditOrderStatusForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::order_statuses::{
    create_order_status, load_order_statuses, modify_order_status, remove_order_status,
};

#[get("/statuses")]
pub async fn show_order_statuses(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_order_statuses(repo.get_ref(), &user) {
        Ok(statuses) => HttpResponse::Ok().json(statuses),
        Err(err) => error_response(err, "list order statuses"),
    }
}

#[post("/statuses")]
pub async fn add_order_status(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddOrderStatusForm>,
) -> impl Responder {
    match create_order_status(repo.get_ref(), &user, form.into_inner()) {
        Ok(status) => HttpResponse::Created().json(status),
        Err(err) => error_response(err, "create order status"),
    }
}

#[put("/statuses/{status_id}")]
pub async fn edit_order_status(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditOrderStatusForm>,
) -> impl Responder {
    let status_id = path.into_inner();

    match modify_order_status(repo.get_ref(), &user, status_id, form.into_inner()) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(err) => error_response(err, &format!("modify order status {status_id}")),
    }
}

#[delete("/statuses/{status_id}")]
pub async fn delete_order_status(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let status_id = path.into_inner();

    match remove_order_status(repo.get_ref(), &user, status_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete order status {status_id}")),
    }
}
