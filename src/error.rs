use thiserror::Error;

/// Failures surfaced by the seating store. Business outcomes such as
/// "show not found" or "time slot taken" are reported as boolean results
/// by the service, never as errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
