pub mod reservation;
pub mod retention;

pub use reservation::ReservationService;
