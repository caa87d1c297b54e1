use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::canteen::{
    Canteen as DomainCanteen, NewCanteen as DomainNewCanteen, UpdateCanteen as DomainUpdateCanteen,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::canteens)]
pub struct Canteen {
    pub id: i32,
    pub address: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::canteens)]
pub struct NewCanteen<'a> {
    pub address: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::canteens)]
pub struct UpdateCanteen<'a> {
    pub address: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Canteen> for DomainCanteen {
    fn from(value: Canteen) -> Self {
        Self {
            id: value.id,
            address: value.address,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCanteen> for NewCanteen<'a> {
    fn from(value: &'a DomainNewCanteen) -> Self {
        Self {
            address: value.address.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateCanteen> for UpdateCanteen<'a> {
    fn from(value: &'a DomainUpdateCanteen) -> Self {
        Self {
            address: value.address.as_str(),
            updated_at: value.updated_at,
        }
    }
}
