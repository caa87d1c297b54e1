use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedEmployee;
use crate::forms::employees::{AddEmployeeForm, EditEmployeeForm, ResetPasswordForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::employees::{
    EmployeeQuery, create_employee, load_employee, load_employees, modify_employee,
    remove_employee, reset_employee_password,
};

#[get("/employees")]
pub async fn show_employees(
    params: web::Query<EmployeeQuery>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_employees(repo.get_ref(), &user, params.into_inner()) {
        Ok(employees) => HttpResponse::Ok().json(employees),
        Err(err) => error_response(err, "list employees"),
    }
}

#[post("/employees")]
pub async fn add_employee(
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddEmployeeForm>,
) -> impl Responder {
    match create_employee(repo.get_ref(), &user, form.into_inner()) {
        Ok(employee) => HttpResponse::Created().json(employee),
        Err(err) => error_response(err, "create employee"),
    }
}

#[get("/employees/{employee_id}")]
pub async fn show_employee(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match load_employee(repo.get_ref(), &user, employee_id) {
        Ok(employee) => HttpResponse::Ok().json(employee),
        Err(err) => error_response(err, &format!("load employee {employee_id}")),
    }
}

#[put("/employees/{employee_id}")]
pub async fn edit_employee(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditEmployeeForm>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match modify_employee(repo.get_ref(), &user, employee_id, form.into_inner()) {
        Ok(employee) => HttpResponse::Ok().json(employee),
        Err(err) => error_response(err, &format!("modify employee {employee_id}")),
    }
}

#[post("/employees/{employee_id}/password")]
pub async fn reset_password(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
    form: web::Json<ResetPasswordForm>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match reset_employee_password(repo.get_ref(), &user, employee_id, form.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("reset password of employee {employee_id}")),
    }
}

#[delete("/employees/{employee_id}")]
pub async fn delete_employee(
    path: web::Path<i32>,
    user: AuthenticatedEmployee,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match remove_employee(repo.get_ref(), &user, employee_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &format!("delete employee {employee_id}")),
    }
}
