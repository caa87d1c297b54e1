use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, post, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::auth::{ChangePasswordForm, LoginForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::auth as auth_service;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    form: web::Json<LoginForm>,
) -> impl Responder {
    let employee = match auth_service::login(repo.get_ref(), form.into_inner()) {
        Ok(employee) => employee,
        Err(ServiceError::Unauthorized) => {
            return HttpResponse::Unauthorized()
                .json(json!({ "error": "wrong phone number or password" }));
        }
        Err(err) => return error_response(err, "log in"),
    };

    let claims = match serde_json::to_string(&employee) {
        Ok(claims) => claims,
        Err(err) => return error_response(ServiceError::Internal(err.to_string()), "log in"),
    };

    if let Err(err) = Identity::login(&req.extensions(), claims) {
        return error_response(ServiceError::Internal(err.to_string()), "log in");
    }

    log::info!("employee {} logged in", employee.id);
    HttpResponse::Ok().json(employee)
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::NoContent().finish()
}

#[post("/password")]
pub async fn change_password(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<ChangePasswordForm>,
) -> impl Responder {
    match auth_service::change_password(repo.get_ref(), &user, form.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "change password"),
    }
}
