use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::orders::{ChangeStatusForm, CreateOrderForm, DecideItemForm, EditOrderItemsForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::orders::{
    OrderQuery, change_order_status, create_order, decide_order_item, edit_order, get_order,
    list_orders, load_order_history, remove_order,
};

#[get("/orders")]
pub async fn show_orders(
    params: web::Query<OrderQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(err) => error_response(err, "list orders"),
    }
}

#[post("/orders")]
pub async fn add_order(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateOrderForm>,
) -> impl Responder {
    match create_order(repo.get_ref(), &user, form.into_inner()) {
        Ok(order) => HttpResponse::Created().json(order),
        Err(err) => error_response(err, "create order"),
    }
}

#[get("/orders/{order_id}")]
pub async fn show_order(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();

    match get_order(repo.get_ref(), &user, order_id) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &format!("load order {order_id}")),
    }
}

#[delete("/orders/{order_id}")]
pub async fn delete_order(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();

    match remove_order(repo.get_ref(), &user, order_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete order {order_id}")),
    }
}

#[put("/orders/{order_id}/items")]
pub async fn edit_order_items(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditOrderItemsForm>,
) -> impl Responder {
    let order_id = path.into_inner();

    match edit_order(repo.get_ref(), &user, order_id, form.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &format!("edit order {order_id}")),
    }
}

#[post("/orders/{order_id}/items/{item_id}/decision")]
pub async fn decide_item(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<DecideItemForm>,
) -> impl Responder {
    let (order_id, item_id) = path.into_inner();

    match decide_order_item(repo.get_ref(), &user, order_id, item_id, form.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &format!("decide item {item_id} of order {order_id}")),
    }
}

#[post("/orders/{order_id}/status")]
pub async fn change_status(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<ChangeStatusForm>,
) -> impl Responder {
    let order_id = path.into_inner();

    match change_order_status(repo.get_ref(), &user, order_id, form.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &format!("change status of order {order_id}")),
    }
}

#[get("/orders/{order_id}/history")]
pub async fn show_history(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();

    match load_order_history(repo.get_ref(), &user, order_id) {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(err) => error_response(err, &format!("load history of order {order_id}")),
    }
}
