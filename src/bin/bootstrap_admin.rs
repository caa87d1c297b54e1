//! Creates the first administrator so the service can be used at all.
//!
//! Reads `ADMIN_PHONE`, `ADMIN_PASSWORD`, `ADMIN_LAST_NAME` and
//! `ADMIN_FIRST_NAME` from the environment (or `.env`).

use std::env;
use std::process::ExitCode;

use dotenvy::dotenv;

use canteen_orders::config::ServerConfig;
use canteen_orders::db::{establish_connection_pool, run_migrations};
use canteen_orders::domain::auth::Role;
use canteen_orders::domain::employee::NewEmployee;
use canteen_orders::repository::{DieselRepository, EmployeeReader, EmployeeWriter};
use canteen_orders::services::auth::hash_password;

fn required(key: &str) -> Option<String> {
    let value = env::var(key).ok().filter(|value| !value.trim().is_empty());
    if value.is_none() {
        log::error!("{key} environment variable not set");
    }
    value
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let (Some(phone), Some(password), Some(last_name), Some(first_name)) = (
        required("ADMIN_PHONE"),
        required("ADMIN_PASSWORD"),
        required("ADMIN_LAST_NAME"),
        required("ADMIN_FIRST_NAME"),
    ) else {
        return ExitCode::FAILURE;
    };

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run migrations: {e}");
        return ExitCode::FAILURE;
    }

    let repo = DieselRepository::new(pool);

    let new_employee = NewEmployee::new(last_name.trim(), first_name.trim(), &phone, String::new())
        .with_role(Role::Admin);

    match repo.get_credentials_by_phone(&new_employee.phone) {
        Ok(Some(existing)) => {
            log::info!(
                "employee {} already uses phone {}, nothing to do",
                existing.employee.id,
                new_employee.phone
            );
            return ExitCode::SUCCESS;
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up employee: {e}");
            return ExitCode::FAILURE;
        }
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let new_employee = NewEmployee {
        password_hash,
        ..new_employee
    };

    match repo.create_employee(&new_employee) {
        Ok(employee) => {
            log::info!("administrator {} created", employee.id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to create administrator: {e}");
            ExitCode::FAILURE
        }
    }
}
