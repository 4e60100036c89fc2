pub mod admin_bookings;
pub mod bookings;
pub mod fields;
pub mod payments;
pub mod users;
