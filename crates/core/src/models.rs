pub mod booking;
pub mod business_hours;
pub mod profile;
pub mod service;
pub mod time_slot;
