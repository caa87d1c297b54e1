use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::auth::Role;
use crate::domain::employee::{NewEmployee, UpdateEmployee, normalize_phone};
use crate::forms::auth::{PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};
use crate::forms::{sanitize_inline_text, sanitize_optional_text};

const NAME_MAX_LEN: u64 = 64;
const PHONE_MAX_LEN: u64 = 32;

pub type EmployeeFormResult<T> = Result<T, EmployeeFormError>;

#[derive(Debug, Error)]
pub enum EmployeeFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },
    #[error("phone number must contain digits")]
    InvalidPhone,
}

/// Payload used by administrators to register an employee.
#[derive(Debug, Deserialize, Validate)]
pub struct AddEmployeeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(max = NAME_MAX_LEN))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = PHONE_MAX_LEN))]
    pub phone: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub canteen_id: Option<i32>,
}

impl AddEmployeeForm {
    /// Sanitize the payload. Returns the new employee with an empty password
    /// hash together with the plain password the caller has to hash.
    pub fn into_new_employee(self) -> EmployeeFormResult<(NewEmployee, String)> {
        self.validate()?;

        let last_name = required_name(&self.last_name, "last name")?;
        let first_name = required_name(&self.first_name, "first name")?;
        let phone = required_phone(&self.phone)?;

        let mut employee = NewEmployee::new(last_name, first_name, &phone, String::new())
            .with_role(self.role);

        if let Some(middle_name) = sanitize_optional_text(self.middle_name.as_deref()) {
            employee = employee.with_middle_name(middle_name);
        }
        if let Some(canteen_id) = self.canteen_id {
            employee = employee.with_canteen_id(canteen_id);
        }

        Ok((employee, self.password))
    }
}

/// Partial update of an employee.
///
/// An empty `middle_name` clears it; `detach_canteen` removes the canteen
/// assignment and wins over `canteen_id`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditEmployeeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: Option<String>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = PHONE_MAX_LEN))]
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub canteen_id: Option<i32>,
    #[serde(default)]
    pub detach_canteen: bool,
}

impl EditEmployeeForm {
    pub fn into_update_employee(self) -> EmployeeFormResult<UpdateEmployee> {
        self.validate()?;

        let mut updates = UpdateEmployee::new();

        if let Some(last_name) = self.last_name.as_deref() {
            updates = updates.last_name(required_name(last_name, "last name")?);
        }
        if let Some(first_name) = self.first_name.as_deref() {
            updates = updates.first_name(required_name(first_name, "first name")?);
        }
        if let Some(middle_name) = self.middle_name.as_deref() {
            updates = updates.middle_name(sanitize_optional_text(Some(middle_name)));
        }
        if let Some(phone) = self.phone.as_deref() {
            updates = updates.phone(&required_phone(phone)?);
        }
        if let Some(role) = self.role {
            updates = updates.role(role);
        }
        if self.detach_canteen {
            updates = updates.canteen_id(None);
        } else if let Some(canteen_id) = self.canteen_id {
            updates = updates.canteen_id(Some(canteen_id));
        }

        Ok(updates)
    }
}

/// New password set by an administrator.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
}

fn required_name(input: &str, field: &'static str) -> EmployeeFormResult<String> {
    let name = sanitize_inline_text(input);
    if name.is_empty() {
        return Err(EmployeeFormError::EmptyName { field });
    }
    Ok(name)
}

fn required_phone(input: &str) -> EmployeeFormResult<String> {
    let phone = normalize_phone(input);
    if !phone.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(EmployeeFormError::InvalidPhone);
    }
    Ok(phone)
}
