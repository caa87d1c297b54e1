//! Supply orders between canteens: catalogs, order lifecycle and invoices.

pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod invoice;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
