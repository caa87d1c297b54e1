use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem, Order as DomainOrder,
    OrderItem as DomainOrderItem,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_canteen_id: i32,
    pub executor_canteen_id: i32,
    pub status_id: i32,
    pub total_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub unit: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub accepted: Option<bool>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub customer_canteen_id: i32,
    pub executor_canteen_id: i32,
    pub status_id: i32,
    pub total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub unit: &'a str,
    pub price_cents: i64,
    pub quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_views)]
pub struct NewOrderView {
    pub order_id: i32,
    pub employee_id: i32,
    pub viewed_at: NaiveDateTime,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            customer_canteen_id: self.customer_canteen_id,
            executor_canteen_id: self.executor_canteen_id,
            status_id: self.status_id,
            total_cents: self.total_cents,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            id: self.id,
            product_id: self.product_id,
            name: self.name,
            unit: self.unit,
            price_cents: self.price_cents,
            quantity: self.quantity,
            decision: self.accepted.into(),
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl From<&DomainNewOrder> for NewOrder {
    fn from(value: &DomainNewOrder) -> Self {
        Self {
            customer_canteen_id: value.customer_canteen_id,
            executor_canteen_id: value.executor_canteen_id,
            status_id: value.status_id,
            total_cents: value.total_cents(),
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainNewOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            unit: value.unit.as_str(),
            price_cents: value.price_cents,
            quantity: value.quantity,
        }
    }
}
