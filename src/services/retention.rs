use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::error::StoreError;
use crate::store::SeatingStore;

/// Rows older than one calendar month (relative to the start of `today`)
/// are considered stale. Month arithmetic clamps at month ends, so a sweep
/// on March 31 uses the last day of February as its anchor.
pub fn retention_cutoff(today: NaiveDate) -> NaiveDateTime {
    let month_ago = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    month_ago.and_time(NaiveTime::MIN)
}

/// Probe-then-delete pass over the store: when nothing is stale the sweep
/// performs no writes at all.
pub async fn sweep<S: SeatingStore>(store: &S, cutoff: NaiveDateTime) -> Result<u64, StoreError> {
    if !store.has_rows_older_than(cutoff).await? {
        return Ok(0);
    }

    let purged = store.delete_rows_older_than(cutoff).await?;
    info!("Retention sweep purged {} rows older than {}", purged, cutoff);
    Ok(purged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySeatingStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cutoff_is_start_of_day_one_month_back() {
        let cutoff = retention_cutoff(date(2024, 5, 15));
        assert_eq!(cutoff, date(2024, 4, 15).and_time(NaiveTime::MIN));
    }

    #[test]
    fn cutoff_clamps_at_month_end() {
        // March 31 minus one month lands on the last day of February.
        assert_eq!(
            retention_cutoff(date(2024, 3, 31)).date(),
            date(2024, 2, 29)
        );
        assert_eq!(
            retention_cutoff(date(2023, 3, 31)).date(),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn cutoff_crosses_year_boundary() {
        assert_eq!(
            retention_cutoff(date(2024, 1, 10)).date(),
            date(2023, 12, 10)
        );
    }

    #[tokio::test]
    async fn sweep_without_stale_rows_deletes_nothing() {
        let store = MemorySeatingStore::new();
        let t = date(2030, 6, 1).and_hms_opt(19, 0, 0).unwrap();
        store.create_show_with_seats(t, "Hamlet", 80).await.unwrap();

        let cutoff = retention_cutoff(date(2024, 5, 15));
        assert_eq!(sweep(&store, cutoff).await.unwrap(), 0);
        assert_eq!(store.all_shows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sweep_purges_show_and_its_seats() {
        let store = MemorySeatingStore::new();
        let stale = date(2024, 1, 1).and_hms_opt(19, 0, 0).unwrap();
        store
            .create_show_with_seats(stale, "Old Hamlet", 80)
            .await
            .unwrap();

        let cutoff = retention_cutoff(date(2024, 5, 15));
        assert_eq!(sweep(&store, cutoff).await.unwrap(), 81);
        assert!(store.all_shows().await.unwrap().is_empty());
        assert!(store.seats_for_show(stale).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn show_exactly_at_cutoff_survives() {
        let store = MemorySeatingStore::new();
        let cutoff = retention_cutoff(date(2024, 5, 15));
        store
            .create_show_with_seats(cutoff, "Boundary", 80)
            .await
            .unwrap();

        // Strictly-older comparison keeps the boundary row.
        assert_eq!(sweep(&store, cutoff).await.unwrap(), 0);
        assert_eq!(store.all_shows().await.unwrap().len(), 1);
    }
}
