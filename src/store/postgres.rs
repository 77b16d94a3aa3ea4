use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::{Seat, Show};
use crate::store::SeatingStore;

/// Postgres-backed store. Seat rows are keyed (show_time, seat_number) and
/// cascade-delete with their show.
#[derive(Clone)]
pub struct PgSeatingStore {
    pool: PgPool,
}

impl PgSeatingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatingStore for PgSeatingStore {
    async fn create_show_with_seats(
        &self,
        show_time: NaiveDateTime,
        name: &str,
        seat_count: i32,
    ) -> Result<bool, StoreError> {
        // Show + seat block goes through one transaction so a reader can
        // never observe a show with fewer seats than it should have.
        let mut tx = self.pool.begin().await?;

        // The primary key arbitrates concurrent adds on the same slot:
        // the loser sees zero rows here, not a unique violation.
        let inserted = sqlx::query(
            r#"
            INSERT INTO shows (show_time, name)
            VALUES ($1, $2)
            ON CONFLICT (show_time) DO NOTHING
            "#,
        )
        .bind(show_time)
        .bind(name)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO seats (show_time, seat_number, reserved)
            SELECT $1::timestamp, n, FALSE FROM generate_series(1, $2::int) AS n
            "#,
        )
        .bind(show_time)
        .bind(seat_count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_show(&self, show_time: NaiveDateTime) -> Result<bool, StoreError> {
        // Seats go with the show via ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM shows WHERE show_time = $1")
            .bind(show_time)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn seats_for_show(&self, show_time: NaiveDateTime) -> Result<Vec<Seat>, StoreError> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT show_time, seat_number, reserved, client_name
            FROM seats
            WHERE show_time = $1
            ORDER BY seat_number
            "#,
        )
        .bind(show_time)
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn find_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
    ) -> Result<Option<Seat>, StoreError> {
        let seat = sqlx::query_as::<_, Seat>(
            r#"
            SELECT show_time, seat_number, reserved, client_name
            FROM seats
            WHERE show_time = $1 AND seat_number = $2
            "#,
        )
        .bind(show_time)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(seat)
    }

    async fn update_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
        reserved: bool,
        client_name: Option<&str>,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE seats
            SET reserved = $3, client_name = $4
            WHERE show_time = $1 AND seat_number = $2
            "#,
        )
        .bind(show_time)
        .bind(seat_number)
        .bind(reserved)
        .bind(client_name)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn all_shows(&self) -> Result<Vec<Show>, StoreError> {
        let shows = sqlx::query_as::<_, Show>(
            "SELECT show_time, name FROM shows ORDER BY show_time",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(shows)
    }

    async fn shows_by_name(&self, name: &str) -> Result<Vec<Show>, StoreError> {
        let shows = sqlx::query_as::<_, Show>(
            "SELECT show_time, name FROM shows WHERE name = $1 ORDER BY show_time",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(shows)
    }

    async fn shows_by_date(&self, date: NaiveDate) -> Result<Vec<Show>, StoreError> {
        let shows = sqlx::query_as::<_, Show>(
            "SELECT show_time, name FROM shows WHERE show_time::date = $1 ORDER BY show_time",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(shows)
    }

    async fn has_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<bool, StoreError> {
        let stale: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM shows WHERE show_time < $1)
                OR EXISTS(SELECT 1 FROM seats WHERE show_time < $1)
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(stale)
    }

    async fn delete_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Seats first so the count covers rows the cascade would otherwise
        // remove silently; the shows delete then has nothing left to cascade.
        let seats = sqlx::query("DELETE FROM seats WHERE show_time < $1")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;

        let shows = sqlx::query("DELETE FROM shows WHERE show_time < $1")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(seats.rows_affected() + shows.rows_affected())
    }
}
