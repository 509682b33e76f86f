pub mod booking;
pub mod guest;
pub mod hotel;
pub mod log;
pub mod prediction;
pub mod statistics;
