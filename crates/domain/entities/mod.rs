pub mod bookings;
pub mod fields;
pub mod users;
