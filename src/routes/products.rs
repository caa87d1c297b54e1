use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::products::{AddProductForm, EditProductForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::products::{
    ProductQuery, create_product, load_product, load_products, modify_product, remove_product,
    upload_products as upload_products_service,
};

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err, "list products"),
    }
}

#[post("/products")]
pub async fn add_product(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err, "create product"),
    }
}

#[post("/products/upload")]
pub async fn upload_products(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match upload_products_service(repo.get_ref(), &user, &mut form) {
        Ok(import) => HttpResponse::Created().json(import),
        Err(err) => error_response(err, "upload products"),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match load_product(repo.get_ref(), &user, product_id) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, &format!("load product {product_id}")),
    }
}

#[put("/products/{product_id}")]
pub async fn edit_product(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match modify_product(repo.get_ref(), &user, product_id, form.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, &format!("modify product {product_id}")),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match remove_product(repo.get_ref(), &user, product_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete product {product_id}")),
    }
}
