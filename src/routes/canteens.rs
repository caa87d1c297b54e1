use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::canteens::{AddCanteenForm, EditCanteenForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::canteens::{
    CanteenQuery, create_canteen, load_canteen, load_canteens, modify_canteen, remove_canteen,
};

#[get("/canteens")]
pub async fn show_canteens(
    params: web::Query<CanteenQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_canteens(repo.get_ref(), &user, params.into_inner()) {
        Ok(canteens) => HttpResponse::Ok().json(canteens),
        Err(err) => error_response(err, "list canteens"),
    }
}

#[post("/canteens")]
pub async fn add_canteen(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddCanteenForm>,
) -> impl Responder {
    match create_canteen(repo.get_ref(), &user, form.into_inner()) {
        Ok(canteen) => HttpResponse::Created().json(canteen),
        Err(err) => error_response(err, "create canteen"),
    }
}

#[get("/canteens/{canteen_id}")]
pub async fn show_canteen(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let canteen_id = path.into_inner();

    match load_canteen(repo.get_ref(), &user, canteen_id) {
        Ok(canteen) => HttpResponse::Ok().json(canteen),
        Err(err) => error_response(err, &format!("load canteen {canteen_id}")),
    }
}

#[put("/canteens/{canteen_id}")]
pub async fn edit_canteen(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditCanteenForm>,
) -> impl Responder {
    let canteen_id = path.into_inner();

    match modify_canteen(repo.get_ref(), &user, canteen_id, form.into_inner()) {
        Ok(canteen) => HttpResponse::Ok().json(canteen),
        Err(err) => error_response(err, &format!("modify canteen {canteen_id}")),
    }
}

#[delete("/canteens/{canteen_id}")]
pub async fn delete_canteen(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let canteen_id = path.into_inner();

    match remove_canteen(repo.get_ref(), &user, canteen_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete canteen {canteen_id}")),
    }
}
