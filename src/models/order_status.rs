use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order_status::{
    NewOrderStatus as DomainNewOrderStatus, OrderStatus as DomainOrderStatus,
    UpdateOrderStatus as DomainUpdateOrderStatus,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::order_statuses)]
pub struct OrderStatus {
    pub id: i32,
    pub name: String,
    pub is_initial: bool,
    pub is_fulfilled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_statuses)]
pub struct NewOrderStatus<'a> {
    pub name: &'a str,
    pub is_initial: bool,
    pub is_fulfilled: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::order_statuses)]
pub struct UpdateOrderStatus<'a> {
    pub name: Option<&'a str>,
    pub is_initial: Option<bool>,
    pub is_fulfilled: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<OrderStatus> for DomainOrderStatus {
    fn from(value: OrderStatus) -> Self {
        Self {
            id: value.id,
            name: value.name,
            is_initial: value.is_initial,
            is_fulfilled: value.is_fulfilled,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewOrderStatus> for NewOrderStatus<'a> {
    fn from(value: &'a DomainNewOrderStatus) -> Self {
        Self {
            name: value.name.as_str(),
            is_initial: value.is_initial,
            is_fulfilled: value.is_fulfilled,
        }
    }
}

impl<'a> From<&'a DomainUpdateOrderStatus> for UpdateOrderStatus<'a> {
    fn from(value: &'a DomainUpdateOrderStatus) -> Self {
        Self {
            name: value.name.as_deref(),
            is_initial: value.is_initial,
            is_fulfilled: value.is_fulfilled,
            updated_at: value.updated_at,
        }
    }
}
