pub mod canteen;
pub mod employee;
pub mod order;
pub mod order_status;
pub mod product;
pub mod status_change;
