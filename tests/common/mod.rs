//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::MigrationHarness;

use canteen_orders::db::{DbPool, MIGRATIONS, establish_connection_pool};
use canteen_orders::domain::auth::{AuthenticatedEmployee, Role};
use canteen_orders::domain::canteen::{Canteen, NewCanteen};
use canteen_orders::domain::employee::{Employee, NewEmployee};
use canteen_orders::domain::product::{NewProduct, Product};
use canteen_orders::repository::{CanteenWriter, DieselRepository, EmployeeWriter, ProductWriter};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Seeded status ids from the catalog migration.
pub const STATUS_CREATED: i32 = 1;
pub const STATUS_IN_PROGRESS: i32 = 2;
pub const STATUS_FULFILLED: i32 = 3;

pub fn canteen(repo: &DieselRepository, address: &str) -> Canteen {
    repo.create_canteen(&NewCanteen::new(address))
        .expect("create canteen")
}

pub fn product(repo: &DieselRepository, name: &str, price_cents: i64) -> Product {
    repo.create_product(&NewProduct::new(name, price_cents, "kg"))
        .expect("create product")
}

pub fn employee(
    repo: &DieselRepository,
    phone: &str,
    role: Role,
    canteen_id: Option<i32>,
) -> Employee {
    let mut new_employee = NewEmployee::new("Orlova", "Nina", phone, "hash").with_role(role);
    if let Some(canteen_id) = canteen_id {
        new_employee = new_employee.with_canteen_id(canteen_id);
    }
    repo.create_employee(&new_employee).expect("create employee")
}

pub fn session(employee: &Employee) -> AuthenticatedEmployee {
    AuthenticatedEmployee::from(employee)
}
