use diesel::dsl::{exists, select};
use diesel::prelude::*;

use crate::domain::canteen::{
    Canteen as DomainCanteen, CanteenListQuery, NewCanteen as DomainNewCanteen,
    UpdateCanteen as DomainUpdateCanteen,
};
use crate::models::canteen::{
    Canteen as DbCanteen, NewCanteen as DbNewCanteen, UpdateCanteen as DbUpdateCanteen,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CanteenReader, CanteenWriter, DieselRepository};

impl CanteenReader for DieselRepository {
    fn get_canteen_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCanteen>> {
        use crate::schema::canteens;

        let mut conn = self.conn()?;
        let canteen = canteens::table
            .filter(canteens::id.eq(id))
            .first::<DbCanteen>(&mut conn)
            .optional()?;

        Ok(canteen.map(Into::into))
    }

    fn list_canteens(
        &self,
        query: CanteenListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCanteen>)> {
        use crate::schema::canteens;

        let mut conn = self.conn()?;

        let mut count_query = canteens::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(canteens::address.like(pattern));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = canteens::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(canteens::address.like(pattern));
        }

        items = items.order(canteens::address.asc());

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let canteens = items.load::<DbCanteen>(&mut conn)?;

        Ok((total, canteens.into_iter().map(Into::into).collect()))
    }
}

impl CanteenWriter for DieselRepository {
    fn create_canteen(&self, new_canteen: &DomainNewCanteen) -> RepositoryResult<DomainCanteen> {
        use crate::schema::canteens;

        let mut conn = self.conn()?;
        let insertable = DbNewCanteen::from(new_canteen);

        let created = diesel::insert_into(canteens::table)
            .values(&insertable)
            .get_result::<DbCanteen>(&mut conn)?;

        Ok(created.into())
    }

    fn update_canteen(
        &self,
        canteen_id: i32,
        updates: &DomainUpdateCanteen,
    ) -> RepositoryResult<DomainCanteen> {
        use crate::schema::canteens;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateCanteen::from(updates);

        let updated = diesel::update(canteens::table.filter(canteens::id.eq(canteen_id)))
            .set(&db_updates)
            .get_result::<DbCanteen>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_canteen(&self, canteen_id: i32) -> RepositoryResult<()> {
        use crate::schema::{canteens, employees, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let has_employees: bool = select(exists(
                employees::table.filter(employees::canteen_id.eq(Some(canteen_id))),
            ))
            .get_result(conn)?;

            if has_employees {
                return Err(RepositoryError::ConstraintViolation(
                    "canteen still has employees".to_string(),
                ));
            }

            let has_orders: bool = select(exists(
                orders::table.filter(
                    orders::customer_canteen_id
                        .eq(canteen_id)
                        .or(orders::executor_canteen_id.eq(canteen_id)),
                ),
            ))
            .get_result(conn)?;

            if has_orders {
                return Err(RepositoryError::ConstraintViolation(
                    "canteen is referenced by orders".to_string(),
                ));
            }

            let deleted = diesel::delete(canteens::table.filter(canteens::id.eq(canteen_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
