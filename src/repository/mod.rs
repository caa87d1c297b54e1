use crate::db::{DbConnection, DbPool};
use crate::domain::canteen::{Canteen, CanteenListQuery, NewCanteen, UpdateCanteen};
use crate::domain::employee::{
    Employee, EmployeeCredentials, EmployeeListQuery, NewEmployee, UpdateEmployee,
};
use crate::domain::order::{
    ItemDecision, NewOrder, Order, OrderListQuery, ReplaceOrderItems, StatusTransition,
};
use crate::domain::order_status::{NewOrderStatus, OrderStatus, UpdateOrderStatus};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::status_change::StatusChange;

use self::errors::RepositoryResult;

pub mod canteen;
pub mod employee;
pub mod errors;
pub mod order;
pub mod order_status;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over employee records.
pub trait EmployeeReader {
    fn get_employee_by_id(&self, id: i32) -> RepositoryResult<Option<Employee>>;
    fn get_credentials_by_phone(&self, phone: &str)
    -> RepositoryResult<Option<EmployeeCredentials>>;
    fn get_credentials_by_id(&self, id: i32) -> RepositoryResult<Option<EmployeeCredentials>>;
    fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
}

/// Write operations over employee records.
pub trait EmployeeWriter {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    fn update_employee(
        &self,
        employee_id: i32,
        updates: &UpdateEmployee,
    ) -> RepositoryResult<Employee>;
    fn update_password_hash(&self, employee_id: i32, password_hash: &str) -> RepositoryResult<()>;
    fn delete_employee(&self, employee_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over canteen records.
pub trait CanteenReader {
    fn get_canteen_by_id(&self, id: i32) -> RepositoryResult<Option<Canteen>>;
    fn list_canteens(&self, query: CanteenListQuery) -> RepositoryResult<(usize, Vec<Canteen>)>;
}

/// Write operations over canteen records.
pub trait CanteenWriter {
    fn create_canteen(&self, new_canteen: &NewCanteen) -> RepositoryResult<Canteen>;
    fn update_canteen(&self, canteen_id: i32, updates: &UpdateCanteen)
    -> RepositoryResult<Canteen>;
    /// Fails with a constraint violation while employees or orders reference the canteen.
    fn delete_canteen(&self, canteen_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the product catalog.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over the product catalog.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Insert all products or none of them.
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the order status catalog.
pub trait OrderStatusReader {
    fn get_order_status_by_id(&self, id: i32) -> RepositoryResult<Option<OrderStatus>>;
    fn get_initial_order_status(&self) -> RepositoryResult<Option<OrderStatus>>;
    fn list_order_statuses(&self) -> RepositoryResult<Vec<OrderStatus>>;
}

/// Write operations over the order status catalog.
pub trait OrderStatusWriter {
    fn create_order_status(&self, new_status: &NewOrderStatus) -> RepositoryResult<OrderStatus>;
    /// Marking a status fulfilled fails with a constraint violation while
    /// orders in it still have undecided items.
    fn update_order_status(
        &self,
        status_id: i32,
        updates: &UpdateOrderStatus,
    ) -> RepositoryResult<OrderStatus>;
    /// Fails with a constraint violation while orders or history rows reference the status.
    fn delete_order_status(&self, status_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over orders and their history.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    /// Subset of `order_ids` that `employee_id` has not viewed since the last change.
    fn list_unviewed_order_ids(
        &self,
        employee_id: i32,
        order_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>>;
    fn list_status_changes(&self, order_id: i32) -> RepositoryResult<Vec<StatusChange>>;
}

/// Write operations over orders. Every method runs in a single transaction.
pub trait OrderWriter {
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Fails with a constraint violation once the order is in a fulfilled status.
    fn replace_order_items(
        &self,
        order_id: i32,
        replacement: &ReplaceOrderItems,
    ) -> RepositoryResult<Order>;
    /// Fails with a constraint violation once the order is in a fulfilled status.
    fn set_item_decision(
        &self,
        order_id: i32,
        item_id: i32,
        decision: ItemDecision,
    ) -> RepositoryResult<Order>;
    /// Apply the transition and append its audit row. Fails with
    /// [`errors::RepositoryError::Conflict`] when the order is no longer in
    /// `from_status_id`.
    fn change_order_status(&self, transition: &StatusTransition) -> RepositoryResult<Order>;
    fn mark_order_viewed(&self, order_id: i32, employee_id: i32) -> RepositoryResult<()>;
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
}
