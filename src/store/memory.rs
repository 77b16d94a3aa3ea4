use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Seat, Show};
use crate::store::SeatingStore;

#[derive(Debug, Default, Clone)]
struct SeatState {
    reserved: bool,
    client_name: Option<String>,
}

#[derive(Debug, Default)]
struct Tables {
    shows: BTreeMap<NaiveDateTime, String>,
    seats: BTreeMap<(NaiveDateTime, i32), SeatState>,
}

/// In-memory store with the same contract as the Postgres one. The write
/// lock plays the role of the transaction: show + seat block appear together
/// or not at all.
#[derive(Debug, Default)]
pub struct MemorySeatingStore {
    inner: RwLock<Tables>,
}

impl MemorySeatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatingStore for MemorySeatingStore {
    async fn create_show_with_seats(
        &self,
        show_time: NaiveDateTime,
        name: &str,
        seat_count: i32,
    ) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.shows.contains_key(&show_time) {
            return Ok(false);
        }
        tables.shows.insert(show_time, name.to_string());
        for seat_number in 1..=seat_count {
            tables
                .seats
                .insert((show_time, seat_number), SeatState::default());
        }
        Ok(true)
    }

    async fn delete_show(&self, show_time: NaiveDateTime) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.shows.remove(&show_time).is_none() {
            return Ok(false);
        }
        tables.seats.retain(|(time, _), _| *time != show_time);
        Ok(true)
    }

    async fn seats_for_show(&self, show_time: NaiveDateTime) -> Result<Vec<Seat>, StoreError> {
        let tables = self.inner.read().await;
        let seats = tables
            .seats
            .range((show_time, i32::MIN)..=(show_time, i32::MAX))
            .map(|(&(time, seat_number), state)| Seat {
                show_time: time,
                seat_number,
                reserved: state.reserved,
                client_name: state.client_name.clone(),
            })
            .collect();
        Ok(seats)
    }

    async fn find_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
    ) -> Result<Option<Seat>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables.seats.get(&(show_time, seat_number)).map(|state| Seat {
            show_time,
            seat_number,
            reserved: state.reserved,
            client_name: state.client_name.clone(),
        }))
    }

    async fn update_seat(
        &self,
        show_time: NaiveDateTime,
        seat_number: i32,
        reserved: bool,
        client_name: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        match tables.seats.get_mut(&(show_time, seat_number)) {
            Some(state) => {
                state.reserved = reserved;
                state.client_name = client_name.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn all_shows(&self) -> Result<Vec<Show>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .shows
            .iter()
            .map(|(&show_time, name)| Show {
                show_time,
                name: name.clone(),
            })
            .collect())
    }

    async fn shows_by_name(&self, name: &str) -> Result<Vec<Show>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .shows
            .iter()
            .filter(|(_, show_name)| show_name.as_str() == name)
            .map(|(&show_time, show_name)| Show {
                show_time,
                name: show_name.clone(),
            })
            .collect())
    }

    async fn shows_by_date(&self, date: NaiveDate) -> Result<Vec<Show>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .shows
            .iter()
            .filter(|(show_time, _)| show_time.date() == date)
            .map(|(&show_time, name)| Show {
                show_time,
                name: name.clone(),
            })
            .collect())
    }

    async fn has_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<bool, StoreError> {
        let tables = self.inner.read().await;
        let stale_show = tables.shows.keys().next().is_some_and(|first| *first < cutoff);
        let stale_seat = tables
            .seats
            .keys()
            .next()
            .is_some_and(|(first, _)| *first < cutoff);
        Ok(stale_show || stale_seat)
    }

    async fn delete_rows_older_than(&self, cutoff: NaiveDateTime) -> Result<u64, StoreError> {
        let mut tables = self.inner.write().await;
        let before = tables.shows.len() + tables.seats.len();
        tables.shows.retain(|show_time, _| *show_time >= cutoff);
        tables.seats.retain(|(show_time, _), _| *show_time >= cutoff);
        let after = tables.shows.len() + tables.seats.len();
        Ok((before - after) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn create_is_atomic_and_conflict_safe() {
        let store = MemorySeatingStore::new();
        let t = at(2024, 5, 1, 19);

        assert!(store.create_show_with_seats(t, "Hamlet", 80).await.unwrap());
        assert_eq!(store.seats_for_show(t).await.unwrap().len(), 80);

        // Second create on the same slot must not touch existing rows.
        store.update_seat(t, 1, true, Some("Alice")).await.unwrap();
        assert!(!store.create_show_with_seats(t, "Othello", 80).await.unwrap());
        let seat = store.find_seat(t, 1).await.unwrap().unwrap();
        assert!(seat.reserved);
        assert_eq!(seat.client_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn concurrent_adds_on_same_slot_yield_one_winner() {
        let store = MemorySeatingStore::new();
        let t = at(2024, 5, 1, 19);

        // A losing racer reports false, never an error.
        let (a, b) = tokio::join!(
            store.create_show_with_seats(t, "Hamlet", 80),
            store.create_show_with_seats(t, "Othello", 80),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(a ^ b);
        assert_eq!(store.seats_for_show(t).await.unwrap().len(), 80);
        assert_eq!(store.all_shows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_show_cascades_to_seats() {
        let store = MemorySeatingStore::new();
        let t = at(2024, 5, 1, 19);
        store.create_show_with_seats(t, "Hamlet", 80).await.unwrap();

        assert!(store.delete_show(t).await.unwrap());
        assert!(store.seats_for_show(t).await.unwrap().is_empty());
        assert!(store.find_seat(t, 1).await.unwrap().is_none());
        assert!(!store.delete_show(t).await.unwrap());
    }

    #[tokio::test]
    async fn update_seat_is_row_scoped() {
        let store = MemorySeatingStore::new();
        let t = at(2024, 5, 1, 19);
        let other = at(2024, 5, 2, 19);
        store.create_show_with_seats(t, "Hamlet", 80).await.unwrap();
        store.create_show_with_seats(other, "Hamlet", 80).await.unwrap();

        assert!(store.update_seat(t, 42, true, Some("Bob")).await.unwrap());
        assert!(!store.find_seat(other, 42).await.unwrap().unwrap().reserved);
        // No row, no write.
        assert!(!store.update_seat(t, 81, true, Some("Eve")).await.unwrap());
    }

    #[tokio::test]
    async fn stale_rows_are_probed_then_purged_together() {
        let store = MemorySeatingStore::new();
        let old = at(2020, 1, 1, 19);
        let fresh = at(2030, 1, 1, 19);
        let cutoff = at(2025, 1, 1, 0);
        store.create_show_with_seats(old, "Old", 80).await.unwrap();
        store.create_show_with_seats(fresh, "Fresh", 80).await.unwrap();

        assert!(store.has_rows_older_than(cutoff).await.unwrap());
        assert_eq!(store.delete_rows_older_than(cutoff).await.unwrap(), 81);
        assert!(!store.has_rows_older_than(cutoff).await.unwrap());
        assert_eq!(store.seats_for_show(fresh).await.unwrap().len(), 80);
    }
}
