pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::StoreError;
use crate::models::{Seat, Show};

pub use memory::MemorySeatingStore;
pub use postgres::PgSeatingStore;

/// Persistence boundary for shows and seats. Each method is atomic on its
/// own; `create_show_with_seats` is the one multi-row unit and must never
/// expose a show without its full seat block.
#[async_trait]
pub trait SeatingStore: Send + Sync {
    /// Creates a show and `seat_count` free seats as one unit.
    /// Returns false without writing anything when the time slot is taken.
    async fn create_show_with_seats(
        &self,
        show_time: NaiveDateTime,
        name: &str,
        seat_count: i32,
    ) -> Result<bool, StoreError>;

    /// Deletes a show and all its seats. False if no show exists.
    async fn delete_show(&self, show_time: NaiveDateTime) -> Result<bool, StoreError>;

    /// All seats of a show ordered by seat number; empty when the show
    /// does not exist.
    async fn seats_for_show(&self, show_time: NaiveDateTime) -> Result<Vec<Seat>, StoreError>;

    async fn find_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
    ) -> Result<Option<Seat>, StoreError>;

    /// Row-scoped write of the seat state (last writer wins). False when
    /// the (show_time, seat_number) row does not exist.
    async fn update_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
        reserved: bool,
        client_name: Option<&str>,
    ) -> Result<bool, StoreError>;

    async fn all_shows(&self) -> Result<Vec<Show>, StoreError>;

    /// Exact, case-sensitive name match.
    async fn shows_by_name(&self, name: &str) -> Result<Vec<Show>, StoreError>;

    /// Matches on the calendar date, ignoring time of day.
    async fn shows_by_date(&self, date: NaiveDate) -> Result<Vec<Show>, StoreError>;

    /// Cheap staleness probe so a sweep with nothing to do performs no writes.
    async fn has_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<bool, StoreError>;

    /// Deletes every show and seat row strictly older than `cutoff`.
    /// Returns the number of rows removed, leaving no orphaned seats.
    async fn delete_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<u64, StoreError>;
}
