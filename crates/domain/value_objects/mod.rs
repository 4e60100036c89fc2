pub mod bookings;
pub mod enums;
pub mod payments;
pub mod users;
