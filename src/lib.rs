pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub service: services::ReservationService<store::PgSeatingStore>,
    pub config: config::Config,
}
