use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::auth::Role;
use crate::domain::employee::{
    Employee as DomainEmployee, EmployeeCredentials, NewEmployee as DomainNewEmployee,
    UpdateEmployee as DomainUpdateEmployee,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::employees)]
pub struct Employee {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub password_hash: String,
    pub role: i32,
    pub canteen_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::employees)]
pub struct NewEmployee<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role: i32,
    pub canteen_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::employees)]
pub struct UpdateEmployee<'a> {
    pub last_name: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub middle_name: Option<Option<&'a str>>,
    pub phone: Option<&'a str>,
    pub role: Option<i32>,
    pub canteen_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

impl From<Employee> for DomainEmployee {
    fn from(value: Employee) -> Self {
        Self {
            id: value.id,
            last_name: value.last_name,
            first_name: value.first_name,
            middle_name: value.middle_name,
            phone: value.phone,
            // The column carries a CHECK constraint; fall back to the least privileged role.
            role: Role::try_from(value.role).unwrap_or_default(),
            canteen_id: value.canteen_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Employee> for EmployeeCredentials {
    fn from(mut value: Employee) -> Self {
        let password_hash = std::mem::take(&mut value.password_hash);
        Self {
            employee: value.into(),
            password_hash,
        }
    }
}

impl<'a> From<&'a DomainNewEmployee> for NewEmployee<'a> {
    fn from(value: &'a DomainNewEmployee) -> Self {
        Self {
            last_name: value.last_name.as_str(),
            first_name: value.first_name.as_str(),
            middle_name: value.middle_name.as_deref(),
            phone: value.phone.as_str(),
            password_hash: value.password_hash.as_str(),
            role: value.role.into(),
            canteen_id: value.canteen_id,
        }
    }
}

impl<'a> From<&'a DomainUpdateEmployee> for UpdateEmployee<'a> {
    fn from(value: &'a DomainUpdateEmployee) -> Self {
        Self {
            last_name: value.last_name.as_deref(),
            first_name: value.first_name.as_deref(),
            middle_name: value
                .middle_name
                .as_ref()
                .map(|middle_name| middle_name.as_deref()),
            phone: value.phone.as_deref(),
            role: value.role.map(i32::from),
            canteen_id: value.canteen_id,
            updated_at: value.updated_at,
        }
    }
}
