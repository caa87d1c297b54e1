use serde::Deserialize;

use crate::domain::auth::AuthenticatedEmployee;
use crate::domain::employee::{Employee, EmployeeListQuery};
use crate::forms::employees::{AddEmployeeForm, EditEmployeeForm, ResetPasswordForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CanteenReader, EmployeeReader, EmployeeWriter};
use crate::services::auth::hash_password;
use crate::services::{ServiceError, ServiceResult, ensure_admin, requested_page};
use validator::Validate;

/// Query parameters accepted by the employee list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Matched against name parts and phone number.
    pub search: Option<String>,
    pub canteen_id: Option<i32>,
    pub page: Option<usize>,
}

pub fn load_employees<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    query: EmployeeQuery,
) -> ServiceResult<Paginated<Employee>>
where
    R: EmployeeReader + ?Sized,
{
    ensure_admin(user)?;

    let EmployeeQuery {
        search,
        canteen_id,
        page,
    } = query;
    let page = requested_page(page);

    let mut list_query = EmployeeListQuery::new();
    if let Some(term) = search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(canteen_id) = canteen_id {
        list_query = list_query.canteen_id(canteen_id);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, employees) = repo.list_employees(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(employees, page, total_pages))
}

pub fn load_employee<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    employee_id: i32,
) -> ServiceResult<Employee>
where
    R: EmployeeReader + ?Sized,
{
    ensure_admin(user)?;

    repo.get_employee_by_id(employee_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Registers an employee with a hashed password.
pub fn create_employee<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    form: AddEmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + CanteenReader + ?Sized,
{
    ensure_admin(user)?;

    let (mut new_employee, password) = form
        .into_new_employee()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(canteen_id) = new_employee.canteen_id {
        ensure_canteen_exists(repo, canteen_id)?;
    }

    new_employee.password_hash = hash_password(&password)?;

    let employee = repo
        .create_employee(&new_employee)
        .map_err(ServiceError::from)?;

    log::info!("employee {} created by {}", employee.id, user.id);

    Ok(employee)
}

pub fn modify_employee<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    employee_id: i32,
    form: EditEmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + CanteenReader + ?Sized,
{
    ensure_admin(user)?;

    let updates = form
        .into_update_employee()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(Some(canteen_id)) = updates.canteen_id {
        ensure_canteen_exists(repo, canteen_id)?;
    }

    repo.update_employee(employee_id, &updates)
        .map_err(ServiceError::from)
}

/// Sets a new password chosen by an administrator.
pub fn reset_employee_password<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    employee_id: i32,
    form: ResetPasswordForm,
) -> ServiceResult<()>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_admin(user)?;

    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let password_hash = hash_password(&form.password)?;

    repo.update_password_hash(employee_id, &password_hash)
        .map_err(ServiceError::from)
}

/// Deletes an employee. Employees referenced by order history are kept.
pub fn remove_employee<R>(
    repo: &R,
    user: &AuthenticatedEmployee,
    employee_id: i32,
) -> ServiceResult<()>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_admin(user)?;

    if employee_id == user.id {
        return Err(ServiceError::Precondition(
            "administrators cannot delete their own account".to_string(),
        ));
    }

    repo.delete_employee(employee_id).map_err(ServiceError::from)
}

fn ensure_canteen_exists<R>(repo: &R, canteen_id: i32) -> ServiceResult<()>
where
    R: CanteenReader + ?Sized,
{
    match repo.get_canteen_by_id(canteen_id).map_err(ServiceError::from)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!(
            "canteen {canteen_id} does not exist"
        ))),
    }
}
