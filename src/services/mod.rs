use crate::domain::auth::AuthenticatedEmployee;

pub mod auth;
pub mod canteens;
pub mod employees;
pub mod errors;
pub mod invoices;
pub mod order_statuses;
pub mod orders;
pub mod products;

pub use errors::{ServiceError, ServiceResult};

/// Reject the request unless the employee is an administrator.
pub(crate) fn ensure_admin(user: &AuthenticatedEmployee) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Page number requested by a client, clamped to at least 1.
pub(crate) fn requested_page(page: Option<usize>) -> usize {
    page.unwrap_or(1).max(1)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::auth::{AuthenticatedEmployee, Role};

    pub fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2025, 3, 1) {
            Some(date) => date.and_hms_opt(9, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    pub fn admin() -> AuthenticatedEmployee {
        AuthenticatedEmployee {
            id: 1,
            name: "Admin".to_string(),
            role: Role::Admin,
            canteen_id: None,
        }
    }

    pub fn employee_of(canteen_id: Option<i32>) -> AuthenticatedEmployee {
        AuthenticatedEmployee {
            id: 5,
            name: "Cook".to_string(),
            role: Role::User,
            canteen_id,
        }
    }
}
