//! Relational accessor: normalized `hotels` / `guests` / `bookings` tables in PostgreSQL.

pub mod bookings;
pub mod guests;
pub mod handlers;
pub mod hotels;
pub mod keys;
pub mod predictions;
pub mod reports;

pub use bookings::PgBookings;
pub use guests::PgGuests;
pub use hotels::PgHotels;
