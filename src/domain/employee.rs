use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::auth::Role;
use crate::pagination::Pagination;

/// Domain representation of an employee account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    /// Phone number in normalized form, used as the login.
    pub phone: String,
    pub role: Role,
    /// Canteen the employee works at, if any.
    pub canteen_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Employee {
    /// Name parts joined in "last first middle" order.
    pub fn full_name(&self) -> String {
        let mut name = format!("{} {}", self.last_name, self.first_name);
        if let Some(middle_name) = self.middle_name.as_deref() {
            name.push(' ');
            name.push_str(middle_name);
        }
        name
    }
}

/// Employee together with the stored password hash. Only used for authentication.
#[derive(Debug, Clone)]
pub struct EmployeeCredentials {
    pub employee: Employee,
    pub password_hash: String,
}

/// Payload required to insert a new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub canteen_id: Option<i32>,
}

impl NewEmployee {
    /// Build a regular (non-admin) employee with a normalized phone number.
    #[must_use]
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        phone: &str,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: None,
            phone: normalize_phone(phone),
            password_hash: password_hash.into(),
            role: Role::User,
            canteen_id: None,
        }
    }

    #[must_use]
    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_canteen_id(mut self, canteen_id: i32) -> Self {
        self.canteen_id = Some(canteen_id);
        self
    }
}

/// Patch data applied when updating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEmployee {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    /// `Some(None)` clears the middle name.
    pub middle_name: Option<Option<String>>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    /// `Some(None)` detaches the employee from their canteen.
    pub canteen_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateEmployee {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateEmployee {
    pub fn new() -> Self {
        Self {
            last_name: None,
            first_name: None,
            middle_name: None,
            phone: None,
            role: None,
            canteen_id: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn middle_name(mut self, middle_name: Option<String>) -> Self {
        self.middle_name = Some(middle_name);
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.phone = Some(normalize_phone(phone));
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn canteen_id(mut self, canteen_id: Option<i32>) -> Self {
        self.canteen_id = Some(canteen_id);
        self
    }

    /// Whether the patch changes anything besides the timestamp.
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.middle_name.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.canteen_id.is_none()
    }
}

/// Query definition used to list employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeListQuery {
    /// Substring matched against name parts and phone.
    pub search: Option<String>,
    pub canteen_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl EmployeeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn canteen_id(mut self, canteen_id: i32) -> Self {
        self.canteen_id = Some(canteen_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Strip formatting from a phone number, keeping digits and a leading `+`.
pub fn normalize_phone(input: &str) -> String {
    let trimmed = input.trim();
    let mut normalized = String::with_capacity(trimmed.len());

    if trimmed.starts_with('+') {
        normalized.push('+');
    }

    normalized.extend(trimmed.chars().filter(char::is_ascii_digit));
    normalized
}
