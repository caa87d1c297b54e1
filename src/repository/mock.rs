use mockall::mock;

use super::errors::RepositoryResult;
use super::{
    CanteenReader, CanteenWriter, EmployeeReader, EmployeeWriter, OrderReader, OrderStatusReader,
    OrderStatusWriter, OrderWriter, ProductReader, ProductWriter,
};
use crate::domain::{
    canteen::{Canteen, CanteenListQuery, NewCanteen, UpdateCanteen},
    employee::{Employee, EmployeeCredentials, EmployeeListQuery, NewEmployee, UpdateEmployee},
    order::{ItemDecision, NewOrder, Order, OrderListQuery, ReplaceOrderItems, StatusTransition},
    order_status::{NewOrderStatus, OrderStatus, UpdateOrderStatus},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    status_change::StatusChange,
};

mock! {
    pub Repository {}

    impl EmployeeReader for Repository {
        fn get_employee_by_id(&self, id: i32) -> RepositoryResult<Option<Employee>>;
        fn get_credentials_by_phone(&self, phone: &str) -> RepositoryResult<Option<EmployeeCredentials>>;
        fn get_credentials_by_id(&self, id: i32) -> RepositoryResult<Option<EmployeeCredentials>>;
        fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
    }

    impl EmployeeWriter for Repository {
        fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
        fn update_employee(&self, employee_id: i32, updates: &UpdateEmployee) -> RepositoryResult<Employee>;
        fn update_password_hash(&self, employee_id: i32, password_hash: &str) -> RepositoryResult<()>;
        fn delete_employee(&self, employee_id: i32) -> RepositoryResult<()>;
    }

    impl CanteenReader for Repository {
        fn get_canteen_by_id(&self, id: i32) -> RepositoryResult<Option<Canteen>>;
        fn list_canteens(&self, query: CanteenListQuery) -> RepositoryResult<(usize, Vec<Canteen>)>;
    }

    impl CanteenWriter for Repository {
        fn create_canteen(&self, new_canteen: &NewCanteen) -> RepositoryResult<Canteen>;
        fn update_canteen(&self, canteen_id: i32, updates: &UpdateCanteen) -> RepositoryResult<Canteen>;
        fn delete_canteen(&self, canteen_id: i32) -> RepositoryResult<()>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }

    impl OrderStatusReader for Repository {
        fn get_order_status_by_id(&self, id: i32) -> RepositoryResult<Option<OrderStatus>>;
        fn get_initial_order_status(&self) -> RepositoryResult<Option<OrderStatus>>;
        fn list_order_statuses(&self) -> RepositoryResult<Vec<OrderStatus>>;
    }

    impl OrderStatusWriter for Repository {
        fn create_order_status(&self, new_status: &NewOrderStatus) -> RepositoryResult<OrderStatus>;
        fn update_order_status(&self, status_id: i32, updates: &UpdateOrderStatus) -> RepositoryResult<OrderStatus>;
        fn delete_order_status(&self, status_id: i32) -> RepositoryResult<()>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn list_unviewed_order_ids(&self, employee_id: i32, order_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
        fn list_status_changes(&self, order_id: i32) -> RepositoryResult<Vec<StatusChange>>;
    }

    impl OrderWriter for Repository {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn replace_order_items(&self, order_id: i32, replacement: &ReplaceOrderItems) -> RepositoryResult<Order>;
        fn set_item_decision(&self, order_id: i32, item_id: i32, decision: ItemDecision) -> RepositoryResult<Order>;
        fn change_order_status(&self, transition: &StatusTransition) -> RepositoryResult<Order>;
        fn mark_order_viewed(&self, order_id: i32, employee_id: i32) -> RepositoryResult<()>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }
}
