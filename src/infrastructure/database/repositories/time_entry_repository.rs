//! SeaORM implementation of TimeEntryRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::{db_err, is_unique_violation};
use crate::domain::time_entry::{
    Coordinates, NewTimeEntry, TimeEntry, TimeEntryFilter, TimeEntryRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::time_entry;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmTimeEntryRepository {
    db: DatabaseConnection,
}

impl SeaOrmTimeEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn paginate(
        &self,
        query: Select<time_entry::Entity>,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>> {
        let paginator = query
            .order_by_desc(time_entry::Column::ClockIn)
            .paginate(&self.db, pagination.limit as u64);
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page((pagination.page - 1) as u64)
            .await
            .map_err(db_err)?;
        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(t: time_entry::Model) -> TimeEntry {
    TimeEntry {
        id: t.id,
        user_id: t.user_id,
        company_id: t.company_id,
        clock_in: t.clock_in,
        clock_out: t.clock_out,
        clock_in_location: Coordinates::from_pair(t.clock_in_latitude, t.clock_in_longitude),
        clock_out_location: Coordinates::from_pair(t.clock_out_latitude, t.clock_out_longitude),
    }
}

fn filter_condition(company_id: &str, filter: &TimeEntryFilter) -> Condition {
    let mut cond = Condition::all().add(time_entry::Column::CompanyId.eq(company_id));
    if let Some(user_id) = &filter.user_id {
        cond = cond.add(time_entry::Column::UserId.eq(user_id.as_str()));
    }
    if let Some(from) = filter.from {
        cond = cond.add(time_entry::Column::ClockIn.gte(from));
    }
    if let Some(to) = filter.to {
        cond = cond.add(time_entry::Column::ClockIn.lt(to));
    }
    if filter.open_only {
        cond = cond.add(time_entry::Column::ClockOut.is_null());
    }
    cond
}

// ── TimeEntryRepository impl ────────────────────────────────────

#[async_trait]
impl TimeEntryRepository for SeaOrmTimeEntryRepository {
    async fn find_open_for_user(&self, user_id: &str) -> DomainResult<Option<TimeEntry>> {
        let model = time_entry::Entity::find()
            .filter(time_entry::Column::UserId.eq(user_id))
            .filter(time_entry::Column::ClockOut.is_null())
            .order_by_desc(time_entry::Column::ClockIn)
            .limit(1)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TimeEntry>> {
        let model = time_entry::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn insert_open(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        debug!("Inserting open time entry {} for {}", entry.id, entry.user_id);
        let model = time_entry::ActiveModel {
            id: Set(entry.id.clone()),
            user_id: Set(entry.user_id.clone()),
            company_id: Set(entry.company_id.clone()),
            clock_in: Set(entry.clock_in),
            clock_out: Set(None),
            clock_in_latitude: Set(entry.clock_in_location.map(|c| c.latitude)),
            clock_in_longitude: Set(entry.clock_in_location.map(|c| c.longitude)),
            clock_out_latitude: Set(None),
            clock_out_longitude: Set(None),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(entry.into_entry()),
            Err(e) if is_unique_violation(&e) => {
                warn!("Open time entry already exists for {}", entry.user_id);
                Err(DomainError::AlreadyClockedIn)
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn close_open(
        &self,
        entry_id: &str,
        user_id: &str,
        clock_out: DateTime<Utc>,
        location: Option<Coordinates>,
    ) -> DomainResult<Option<TimeEntry>> {
        let result = time_entry::Entity::update_many()
            .col_expr(time_entry::Column::ClockOut, Expr::value(Some(clock_out)))
            .col_expr(
                time_entry::Column::ClockOutLatitude,
                Expr::value(location.map(|c| c.latitude)),
            )
            .col_expr(
                time_entry::Column::ClockOutLongitude,
                Expr::value(location.map(|c| c.longitude)),
            )
            .filter(time_entry::Column::Id.eq(entry_id))
            .filter(time_entry::Column::UserId.eq(user_id))
            .filter(time_entry::Column::ClockOut.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            debug!("No open entry {} for {}", entry_id, user_id);
            return Ok(None);
        }
        self.find_by_id(entry_id).await
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>> {
        let query = time_entry::Entity::find().filter(time_entry::Column::UserId.eq(user_id));
        self.paginate(query, pagination).await
    }

    async fn list_for_company(
        &self,
        company_id: &str,
        filter: TimeEntryFilter,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>> {
        let query = time_entry::Entity::find().filter(filter_condition(company_id, &filter));
        self.paginate(query, pagination).await
    }

    async fn list_for_company_in_range(
        &self,
        company_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<TimeEntry>> {
        let filter = TimeEntryFilter {
            from,
            to,
            ..Default::default()
        };
        let models = time_entry::Entity::find()
            .filter(filter_condition(company_id, &filter))
            .order_by_asc(time_entry::Column::ClockIn)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::{seed_employee_in, test_db};
    use crate::shared::store_now;
    use chrono::Duration;
    use sea_orm::{DatabaseConnection, EntityTrait};

    fn new_entry(id: &str, user_id: &str, at: DateTime<Utc>) -> NewTimeEntry {
        NewTimeEntry {
            id: id.into(),
            user_id: user_id.into(),
            company_id: "c1".into(),
            clock_in: at,
            clock_in_location: None,
        }
    }

    async fn setup() -> (DatabaseConnection, SeaOrmTimeEntryRepository) {
        let db = test_db().await;
        seed_employee_in(&db, "u1", "c1").await;
        seed_employee_in(&db, "u2", "c1").await;
        (db.clone(), SeaOrmTimeEntryRepository::new(db))
    }

    async fn open_rows(db: &DatabaseConnection, user_id: &str) -> usize {
        time_entry::Entity::find()
            .filter(time_entry::Column::UserId.eq(user_id))
            .filter(time_entry::Column::ClockOut.is_null())
            .all(db)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn second_open_entry_is_rejected_by_the_store() {
        let (db, repo) = setup().await;
        repo.insert_open(new_entry("e1", "u1", store_now()))
            .await
            .unwrap();
        let err = repo
            .insert_open(new_entry("e2", "u1", store_now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyClockedIn));
        assert_eq!(open_rows(&db, "u1").await, 1);

        // Another user is unaffected
        repo.insert_open(new_entry("e3", "u2", store_now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn closed_entries_do_not_block_a_new_one() {
        let (db, repo) = setup().await;
        repo.insert_open(new_entry("e1", "u1", store_now()))
            .await
            .unwrap();
        let closed = repo
            .close_open("e1", "u1", store_now(), None)
            .await
            .unwrap()
            .unwrap();
        assert!(closed.clock_out.is_some());

        repo.insert_open(new_entry("e2", "u1", store_now()))
            .await
            .unwrap();
        assert_eq!(open_rows(&db, "u1").await, 1);
        let open = repo.find_open_for_user("u1").await.unwrap().unwrap();
        assert_eq!(open.id, "e2");
    }

    #[tokio::test]
    async fn close_is_conditional_on_owner_and_open_state() {
        let (_db, repo) = setup().await;
        repo.insert_open(new_entry("e1", "u1", store_now()))
            .await
            .unwrap();

        // Foreign user cannot close it
        let foreign = repo.close_open("e1", "u2", store_now(), None).await.unwrap();
        assert!(foreign.is_none());
        assert!(repo.find_by_id("e1").await.unwrap().unwrap().is_open());

        let first = repo.close_open("e1", "u1", store_now(), None).await.unwrap();
        let stamped = first.unwrap().clock_out;

        // Closing twice leaves the first clock-out untouched
        let again = repo
            .close_open("e1", "u1", store_now() + Duration::hours(1), None)
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(repo.find_by_id("e1").await.unwrap().unwrap().clock_out, stamped);
    }

    #[tokio::test]
    async fn timestamps_and_coordinates_round_trip() {
        let (_db, repo) = setup().await;
        let at = store_now();
        let here = Coordinates::new(41.311081, 69.240562).unwrap();
        repo.insert_open(NewTimeEntry {
            clock_in_location: Some(here),
            ..new_entry("e1", "u1", at)
        })
        .await
        .unwrap();

        let there = Coordinates::new(-33.8688, 151.2093).unwrap();
        let out_at = store_now();
        repo.close_open("e1", "u1", out_at, Some(there))
            .await
            .unwrap();

        let stored = repo.find_by_id("e1").await.unwrap().unwrap();
        assert_eq!(stored.clock_in, at);
        assert_eq!(stored.clock_out, Some(out_at));
        assert_eq!(stored.clock_in_location, Some(here));
        assert_eq!(stored.clock_out_location, Some(there));
    }

    #[tokio::test]
    async fn company_listing_filters_and_paginates() {
        let (_db, repo) = setup().await;
        let base = store_now() - Duration::days(3);
        for i in 0..3 {
            let id = format!("e{}", i);
            let at = base + Duration::days(i);
            repo.insert_open(new_entry(&id, "u1", at)).await.unwrap();
            repo.close_open(&id, "u1", at + Duration::hours(8), None)
                .await
                .unwrap();
        }
        repo.insert_open(new_entry("open", "u2", store_now()))
            .await
            .unwrap();

        let all = repo
            .list_for_company("c1", TimeEntryFilter::default(), PaginationParams::new(1, 2))
            .await
            .unwrap();
        assert_eq!(all.total, 4);
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.total_pages, 2);
        assert_eq!(all.items[0].id, "open");

        let open_only = repo
            .list_for_company(
                "c1",
                TimeEntryFilter {
                    open_only: true,
                    ..Default::default()
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(open_only.total, 1);

        let ranged = repo
            .list_for_company_in_range("c1", Some(base + Duration::days(1)), None)
            .await
            .unwrap();
        assert_eq!(ranged.len(), 3);
        assert_eq!(ranged[0].id, "e1");

        let mine = repo
            .list_for_user("u1", PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 3);
    }
}
