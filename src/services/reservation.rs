use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::StoreError;
use crate::models::seat::truncate_client_name;
use crate::models::SEATS_PER_SHOW;
use crate::services::retention;
use crate::store::SeatingStore;

/// Business logic over a [`SeatingStore`]. Show lifecycle, seat state
/// transitions and the opportunistic retention sweep live here; all
/// business-level failures come back as boolean outcomes.
#[derive(Clone)]
pub struct ReservationService<S> {
    store: S,
}

impl<S: SeatingStore> ReservationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a show and its 80 free seats. False when the time slot is
    /// already taken. Sweeps stale rows before returning on both paths.
    pub async fn add_show(&self, show_time: NaiveDateTime, name: &str) -> Result<bool, StoreError> {
        let created = self
            .store
            .create_show_with_seats(show_time, name, SEATS_PER_SHOW)
            .await?;
        if !created {
            debug!("add_show: slot {} already taken", show_time);
        }
        self.sweep_old_entries().await?;
        Ok(created)
    }

    /// Removes a show and all its seats. False when no show exists at
    /// that exact timestamp.
    pub async fn delete_show(&self, show_time: NaiveDateTime) -> Result<bool, StoreError> {
        let deleted = self.store.delete_show(show_time).await?;
        self.sweep_old_entries().await?;
        Ok(deleted)
    }

    /// Seat number -> reserved state for one show; empty map when no show
    /// exists at that exact timestamp.
    pub async fn seating_info(
        &self,
        show_time: NaiveDateTime,
    ) -> Result<BTreeMap<i32, Option<bool>>, StoreError> {
        let seats = self.store.seats_for_show(show_time).await?;
        Ok(seats
            .into_iter()
            .map(|seat| (seat.seat_number, Some(seat.reserved)))
            .collect())
    }

    /// Client name on a reserved seat. `None` when the show or seat does
    /// not exist, or the seat is free.
    pub async fn reservation_name(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
    ) -> Result<Option<String>, StoreError> {
        let seat = self.store.find_seat(show_time, seat_number).await?;
        Ok(seat.and_then(|s| s.client_name))
    }

    pub async fn shows(&self) -> Result<BTreeMap<NaiveDateTime, String>, StoreError> {
        Ok(collect(self.store.all_shows().await?))
    }

    /// Exact, case-sensitive match on the show name.
    pub async fn shows_by_name(
        &self,
        name: &str,
    ) -> Result<BTreeMap<NaiveDateTime, String>, StoreError> {
        Ok(collect(self.store.shows_by_name(name).await?))
    }

    /// Shows on a calendar date, time of day ignored.
    pub async fn shows_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDateTime, String>, StoreError> {
        Ok(collect(self.store.shows_by_date(date).await?))
    }

    /// Reserves a seat for a client, last writer wins. False when the
    /// (show, seat) pair does not exist. Names longer than 100 characters
    /// are stored truncated.
    pub async fn make_reservation(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
        client_name: &str,
    ) -> Result<bool, StoreError> {
        let stored = truncate_client_name(client_name);
        self.store
            .update_seat(show_time, seat_number, true, Some(&stored))
            .await
    }

    /// Frees a seat and clears its client name. False when the (show,
    /// seat) pair does not exist; repeating it on a free seat stays true.
    pub async fn cancel_reservation(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
    ) -> Result<bool, StoreError> {
        self.store
            .update_seat(show_time, seat_number, false, None)
            .await
    }

    /// Purges shows and seats older than one month before today.
    pub async fn sweep_old_entries(&self) -> Result<u64, StoreError> {
        let cutoff = retention::retention_cutoff(Local::now().date_naive());
        retention::sweep(&self.store, cutoff).await
    }
}

fn collect(shows: Vec<crate::models::Show>) -> BTreeMap<NaiveDateTime, String> {
    shows
        .into_iter()
        .map(|show| (show.show_time, show.name))
        .collect()
}
