pub mod seat;
pub mod show;

pub use seat::{Seat, MAX_CLIENT_NAME_CHARS, SEATS_PER_SHOW};
pub use show::Show;
