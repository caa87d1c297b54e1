use diesel::prelude::*;

use crate::domain::employee::{
    Employee as DomainEmployee, EmployeeCredentials, EmployeeListQuery,
    NewEmployee as DomainNewEmployee, UpdateEmployee as DomainUpdateEmployee,
};
use crate::models::employee::{
    Employee as DbEmployee, NewEmployee as DbNewEmployee, UpdateEmployee as DbUpdateEmployee,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, EmployeeReader, EmployeeWriter};

impl EmployeeReader for DieselRepository {
    fn get_employee_by_id(&self, id: i32) -> RepositoryResult<Option<DomainEmployee>> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::id.eq(id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn get_credentials_by_phone(
        &self,
        phone: &str,
    ) -> RepositoryResult<Option<EmployeeCredentials>> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::phone.eq(phone))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn get_credentials_by_id(&self, id: i32) -> RepositoryResult<Option<EmployeeCredentials>> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::id.eq(id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn list_employees(
        &self,
        query: EmployeeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainEmployee>)> {
        use crate::schema::employees;

        let mut conn = self.conn()?;

        let mut count_query = employees::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                employees::last_name
                    .like(pattern.clone())
                    .or(employees::first_name.like(pattern.clone()))
                    .or(employees::middle_name.like(pattern.clone()))
                    .or(employees::phone.like(pattern)),
            );
        }

        if let Some(canteen_id) = query.canteen_id {
            count_query = count_query.filter(employees::canteen_id.eq(Some(canteen_id)));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = employees::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                employees::last_name
                    .like(pattern.clone())
                    .or(employees::first_name.like(pattern.clone()))
                    .or(employees::middle_name.like(pattern.clone()))
                    .or(employees::phone.like(pattern)),
            );
        }

        if let Some(canteen_id) = query.canteen_id {
            items = items.filter(employees::canteen_id.eq(Some(canteen_id)));
        }

        items = items.order((employees::last_name.asc(), employees::first_name.asc()));

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let db_employees = items.load::<DbEmployee>(&mut conn)?;

        Ok((total, db_employees.into_iter().map(Into::into).collect()))
    }
}

impl EmployeeWriter for DieselRepository {
    fn create_employee(
        &self,
        new_employee: &DomainNewEmployee,
    ) -> RepositoryResult<DomainEmployee> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_new = DbNewEmployee::from(new_employee);

        let created = diesel::insert_into(employees::table)
            .values(&db_new)
            .get_result::<DbEmployee>(&mut conn)?;

        Ok(created.into())
    }

    fn update_employee(
        &self,
        employee_id: i32,
        updates: &DomainUpdateEmployee,
    ) -> RepositoryResult<DomainEmployee> {
        use crate::schema::employees;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateEmployee::from(updates);

        let updated = diesel::update(employees::table.filter(employees::id.eq(employee_id)))
            .set(&db_updates)
            .get_result::<DbEmployee>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_password_hash(&self, employee_id: i32, password_hash: &str) -> RepositoryResult<()> {
        use crate::schema::employees;

        let mut conn = self.conn()?;

        let updated = diesel::update(employees::table.filter(employees::id.eq(employee_id)))
            .set((
                employees::password_hash.eq(password_hash),
                employees::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_employee(&self, employee_id: i32) -> RepositoryResult<()> {
        use crate::schema::employees;

        let mut conn = self.conn()?;

        // Audit rows reference the author, so the foreign key rejects deleting
        // anyone who has changed an order status.
        let deleted = diesel::delete(employees::table.filter(employees::id.eq(employee_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
