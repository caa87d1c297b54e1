use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use tera::Tera;

use canteen_orders::domain::auth::Role;
use canteen_orders::domain::employee::{Employee, NewEmployee, UpdateEmployee};
use canteen_orders::invoice::{INVOICE_TEMPLATE, LocalInvoiceStore};
use canteen_orders::repository::{DieselRepository, EmployeeWriter};
use canteen_orders::routes;
use canteen_orders::routes::invoices::SharedInvoiceStore;
use canteen_orders::services::auth::hash_password;

mod common;

fn seed_employee(
    repo: &DieselRepository,
    phone: &str,
    password: &str,
    role: Role,
    canteen_id: Option<i32>,
) -> Employee {
    let hash = hash_password(password).expect("hash password");
    let mut new_employee = NewEmployee::new("Sokolova", "Vera", phone, hash).with_role(role);
    if let Some(canteen_id) = canteen_id {
        new_employee = new_employee.with_canteen_id(canteen_id);
    }
    repo.create_employee(&new_employee)
        .expect("create employee")
}

fn login_request(phone: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "phone": phone, "password": password }))
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned()
}

fn invoice_tera() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template(INVOICE_TEMPLATE, include_str!("../templates/invoice.xml"))
        .expect("template should parse");
    tera
}

#[actix_web::test]
async fn test_login_session_and_error_mapping() {
    let test_db = common::TestDb::new("test_login_session_and_error_mapping.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_employee(&repo, "+79001112233", "kitchen-admin", Role::Admin, None);
    seed_employee(&repo, "+79004445566", "kitchen-user", Role::User, None);

    let app = test::init_service(
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(repo))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/orders").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "phone": "+7 900 111-22-33", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "phone": "+7 900 111-22-33", "password": "kitchen-admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let admin_cookie: Cookie<'static> = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(admin_cookie.clone())
        .set_json(json!({ "address": "Central kitchen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(admin_cookie.clone())
        .set_json(json!({ "address": "Central kitchen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(admin_cookie.clone())
        .set_json(json!({ "address": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("error").is_some());

    let req = test::TestRequest::get()
        .uri("/canteens/999")
        .cookie(admin_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "phone": "+79004445566", "password": "kitchen-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user_cookie: Cookie<'static> = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(user_cookie.clone())
        .set_json(json!({ "address": "School 4" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/canteens")
        .cookie(user_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_order_flow_through_invoice_download() {
    let test_db = common::TestDb::new("test_order_flow_through_invoice_download.db");
    let repo = DieselRepository::new(test_db.pool());
    let school = common::canteen(&repo, "School 4");
    let kitchen = common::canteen(&repo, "Central kitchen");
    let buckwheat = common::product(&repo, "Buckwheat", 2200);
    seed_employee(&repo, "+79001112233", "kitchen-admin", Role::Admin, None);
    seed_employee(&repo, "+79002223344", "school-cook", Role::User, Some(school.id));
    seed_employee(&repo, "+79003334455", "kitchen-chef", Role::User, Some(kitchen.id));

    let dir = tempfile::tempdir().expect("temp dir");
    let store: Arc<SharedInvoiceStore> = Arc::new(LocalInvoiceStore::new(dir.path()));

    let app = test::init_service(
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(repo))
            .app_data(web::Data::new(invoice_tera()))
            .app_data(web::Data::from(store))
            .configure(routes::configure),
    )
    .await;

    let req = login_request("+79001112233", "kitchen-admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let admin = session_cookie(&resp);
    let req = login_request("+79002223344", "school-cook").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cook = session_cookie(&resp);
    let req = login_request("+79003334455", "kitchen-chef").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let chef = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/orders")
        .cookie(cook.clone())
        .set_json(json!({
            "executor_canteen_id": kitchen.id,
            "items": [{ "product_id": buckwheat.id, "quantity": 3 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_i64().expect("order id");
    assert_eq!(order["customer_canteen_id"], json!(school.id));

    let req = test::TestRequest::get()
        .uri("/orders")
        .cookie(chef.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["orders"]["items"][0]["id"], json!(order_id));
    assert_eq!(page["unviewed"], json!([order_id]));

    let items = json!({ "items": [{ "product_id": buckwheat.id, "quantity": 5 }] });
    let req = test::TestRequest::put()
        .uri(&format!("/orders/{order_id}/items"))
        .cookie(chef.clone())
        .set_json(&items)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/orders/{order_id}/items"))
        .cookie(cook.clone())
        .set_json(&items)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["total_cents"], json!(11000));
    let item_id = order["items"][0]["id"].as_i64().expect("item id");

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/items/{item_id}/decision"))
        .cookie(chef.clone())
        .set_json(json!({ "accepted": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["items"][0]["decision"], json!("accepted"));

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}/invoice"))
        .cookie(admin.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/invoice"))
        .cookie(admin.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let status = json!({ "status_id": common::STATUS_FULFILLED });
    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/status"))
        .cookie(cook.clone())
        .set_json(&status)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/status"))
        .cookie(admin.clone())
        .set_json(&status)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["status_id"], json!(common::STATUS_FULFILLED));

    // Fulfilled orders no longer accept edits.
    let req = test::TestRequest::put()
        .uri(&format!("/orders/{order_id}/items"))
        .cookie(cook.clone())
        .set_json(&items)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/invoice"))
        .cookie(admin.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let receipt: Value = test::read_body_json(resp).await;
    assert_eq!(receipt["order_id"], json!(order_id));

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}/invoice"))
        .cookie(cook.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("content disposition");
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&format!("invoice-{order_id}.pdf")));
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{order_id}/history"))
        .cookie(chef)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Value = test::read_body_json(resp).await;
    let history = history.as_array().expect("history list");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["new_status_id"], json!(common::STATUS_FULFILLED));
}

#[actix_web::test]
async fn test_session_follows_the_stored_account() {
    let test_db = common::TestDb::new("test_session_follows_the_stored_account.db");
    let repo = DieselRepository::new(test_db.pool());
    let admin = seed_employee(&repo, "+79001112233", "kitchen-admin", Role::Admin, None);

    let app = test::init_service(
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(repo.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = login_request("+79001112233", "kitchen-admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(cookie.clone())
        .set_json(json!({ "address": "School 4" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    repo.update_employee(admin.id, &UpdateEmployee::new().role(Role::User))
        .expect("demote employee");

    let req = test::TestRequest::post()
        .uri("/canteens")
        .cookie(cookie.clone())
        .set_json(json!({ "address": "School 5" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    repo.delete_employee(admin.id).expect("delete employee");

    let req = test::TestRequest::get()
        .uri("/canteens")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
